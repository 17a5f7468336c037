use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::{link::LinkStatus, state::AppState};

pub fn render_terminal_pane(f: &mut Frame, area: Rect, state: &AppState) {
    // Two rows go to the border
    let height = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .visible_lines(height)
        .into_iter()
        .map(Line::from)
        .collect();

    let mut title = String::from("Output");
    if !state.autoscroll {
        title.push_str(" [autoscroll off]");
    }
    if state.scroll_offset > 0 {
        title.push_str(&format!(" [-{}]", state.scroll_offset));
    }

    let border_color = if state.link == LinkStatus::Connected {
        Color::Green
    } else {
        Color::DarkGray
    };
    let pane = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border_color)),
    );

    f.render_widget(pane, area);
}
