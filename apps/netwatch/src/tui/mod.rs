mod state;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::monitoring::HostTable;
use state::AppState;

/// Run the dashboard until the user quits.
///
/// Each pass takes a fresh snapshot of the host table; the probe loops
/// are never blocked by rendering.
pub async fn run(table: Arc<HostTable>, tick: Duration) -> Result<()> {
    // Init terminal in alternate screen
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(&mut stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app_state = AppState::new(table);

    loop {
        app_state.refresh();

        terminal.draw(|f| {
            ui::render(f, &mut app_state);
        })?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if should_quit(key) {
                    break;
                }
                app_state.handle_key(key.code);
            }
        }
    }

    // Cleanup terminal
    drop(terminal);
    let exec_result = execute!(stdout, Show, LeaveAlternateScreen);
    let raw_mode_result = disable_raw_mode();
    exec_result.and(raw_mode_result)?;
    Ok(())
}

fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
