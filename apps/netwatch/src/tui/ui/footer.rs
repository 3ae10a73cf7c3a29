use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

pub fn render(f: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(Span::styled(
        "Q/Esc: Quit   \u{2191}/\u{2193}: Scroll   Home/End: Jump",
        Style::default().fg(Color::Cyan),
    )))
    .alignment(Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(hints, area);
}
