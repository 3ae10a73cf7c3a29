use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use super::{COLOR_ACTIVE, COLOR_BRAND, COLOR_ERROR, COLOR_MUTED, COLOR_SUCCESS};
use crate::monitoring::{HostRecord, Trend};
use crate::tui::state::AppState;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let border_style = Style::default().fg(COLOR_BRAND);
    let title = " Live Metrics ";

    if state.hosts.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No hosts loaded", Style::default().fg(COLOR_MUTED))),
        ])
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border_style));

        f.render_widget(Clear, area);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = state
        .hosts
        .iter()
        .skip(state.scroll)
        .map(host_row)
        .collect();

    let widths = [
        Constraint::Min(15),
        Constraint::Min(18),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                Cell::from("Host"),
                Cell::from("Hostname"),
                Cell::from("Status"),
                Cell::from("Latency"),
                Cell::from("Jitter"),
                Cell::from("Success %"),
            ])
            .style(Style::default().fg(COLOR_BRAND).add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border_style));

    f.render_widget(Clear, area);
    f.render_widget(table, area);
}

fn host_row(host: &HostRecord) -> Row<'static> {
    let (icon, status_color) =
        if host.is_up { ("\u{25cf}", COLOR_SUCCESS) } else { ("\u{25cb}", COLOR_ERROR) };

    // Rising average latency is the bad direction.
    let (arrow, arrow_color) = match host.trend {
        Trend::Up => ("\u{2191}", COLOR_ERROR),
        Trend::Down => ("\u{2193}", COLOR_SUCCESS),
        Trend::Flat => ("-", COLOR_MUTED),
    };

    Row::new(vec![
        Cell::from(Span::styled(host.target.clone(), Style::default().fg(COLOR_ACTIVE))),
        Cell::from(Span::styled(host.display_name.clone(), Style::default().fg(COLOR_MUTED))),
        Cell::from(Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(status_color)),
            Span::styled(host.last_status.to_string(), Style::default().fg(status_color)),
        ])),
        Cell::from(Line::from(vec![
            Span::raw(format!("{:.1}ms ", host.avg_latency_ms)),
            Span::styled(arrow.to_string(), Style::default().fg(arrow_color)),
        ])),
        Cell::from(format!("{:.1}ms", host.jitter_ms)),
        Cell::from(format!("{:.0}%", host.success_rate_pct)),
    ])
}
