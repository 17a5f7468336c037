use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::{
    state::AppState,
    widgets::{
        connect::render_connect_popup, header::render_header, help::render_help_popup,
        status::render_status_bar, terminal::render_terminal_pane,
    },
};

pub fn draw_ui(f: &mut Frame, state: &AppState) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Connection header
            Constraint::Min(0),    // Device output
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    render_header(f, chunks[0], state);
    render_terminal_pane(f, chunks[1], state);
    render_status_bar(f, chunks[2], state);

    if let Some(form) = &state.connect_form {
        render_connect_popup(f, size, form);
    } else if state.show_help {
        render_help_popup(f, size, state);
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
