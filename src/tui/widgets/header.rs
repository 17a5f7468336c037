use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::{link::LinkStatus, state::AppState};

pub fn render_header(f: &mut Frame, area: Rect, state: &AppState) {
    let (status, status_color) = match state.link {
        LinkStatus::Connected => ("Connected", Color::Green),
        LinkStatus::Disconnecting => ("Disconnecting", Color::Yellow),
        LinkStatus::Disconnected => ("Disconnected", Color::Red),
    };

    let line = Line::from(vec![
        Span::styled(&state.port, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" @ {} baud", state.baud_rate)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(status, Style::default().fg(status_color)),
        Span::styled(" | Log: ", Style::default().fg(Color::Gray)),
        Span::raw(state.log_file.display().to_string()),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Serial Logger")
            .style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}
