use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::{COLOR_BRAND, COLOR_ERROR, COLOR_LABEL, COLOR_SUCCESS};
use crate::tui::state::AppState;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let (total, up, down) = state.totals();

    // Any host down turns the whole header border red.
    let border_color = if down > 0 { COLOR_ERROR } else { COLOR_SUCCESS };

    let counts = Line::from(vec![
        Span::styled("Total Hosts: ", Style::default().fg(COLOR_LABEL)),
        Span::styled(total.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("Online: ", Style::default().fg(COLOR_LABEL)),
        Span::styled(
            up.to_string(),
            Style::default().fg(COLOR_SUCCESS).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Offline: ", Style::default().fg(COLOR_LABEL)),
        Span::styled(
            down.to_string(),
            Style::default().fg(COLOR_ERROR).add_modifier(Modifier::BOLD),
        ),
    ]);

    let header = Paragraph::new(vec![counts])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    " Network Status Monitor ",
                    Style::default().fg(COLOR_BRAND).add_modifier(Modifier::BOLD),
                ))
                .border_style(Style::default().fg(border_color)),
        );

    f.render_widget(Clear, area);
    f.render_widget(header, area);
}
