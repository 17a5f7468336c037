use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::{state::AppState, ui::centered_rect};

pub fn render_help_popup(f: &mut Frame, area: Rect, _state: &AppState) {
    let popup_area = centered_rect(60, 60, area);

    // Clear the background
    f.render_widget(Clear, popup_area);

    let help_content = vec![
        Line::from("Serial Logger Help"),
        Line::from(""),
        Line::from("  q / Esc / Ctrl-C  - Quit"),
        Line::from("  h                 - Toggle help"),
        Line::from("  d                 - Disconnect / reconnect"),
        Line::from("  p                 - Choose device, baud rate and log file"),
        Line::from("  c                 - Clear output"),
        Line::from("  a                 - Toggle autoscroll"),
        Line::from(""),
        Line::from("Scrolling:"),
        Line::from("  Up / k, Down / j  - One line"),
        Line::from("  PgUp / PgDn       - One page"),
        Line::from("  End               - Jump to newest"),
    ];

    let help = Paragraph::new(help_content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(help, popup_area);
}
