use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::{
    form::{ConnectField, ConnectForm},
    ui::centered_rect,
};

pub fn render_connect_popup(f: &mut Frame, area: Rect, form: &ConnectForm) {
    let popup_area = centered_rect(70, 70, area);
    f.render_widget(Clear, popup_area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title("Connect")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = outer.inner(popup_area);
    f.render_widget(outer, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Devices
            Constraint::Length(3), // Baud rate
            Constraint::Length(3), // Log file
            Constraint::Length(2), // Controls
        ])
        .split(inner);

    render_ports(f, chunks[0], form);
    render_baud(f, chunks[1], form);
    render_log_file(f, chunks[2], form);
    render_controls(f, chunks[3]);
}

fn field_block(title: &str, active: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
}

fn render_ports(f: &mut Frame, area: Rect, form: &ConnectForm) {
    let content: Vec<Line> = if form.ports.is_empty() {
        vec![Line::from(Span::styled(
            "No serial ports found",
            Style::default().fg(Color::Red),
        ))]
    } else {
        form.ports
            .iter()
            .enumerate()
            .map(|(index, port)| {
                let selected = index == form.port_index;
                let marker = if selected { "> " } else { "  " };
                let style = if selected {
                    Style::default().add_modifier(Modifier::BOLD).fg(Color::Green)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{}{}", marker, port.name), style),
                    Span::styled(format!("  {}", port.description), Style::default().fg(Color::Gray)),
                ])
            })
            .collect()
    };

    let ports = Paragraph::new(content).block(field_block("Device", form.field == ConnectField::Port));
    f.render_widget(ports, area);
}

fn render_baud(f: &mut Frame, area: Rect, form: &ConnectForm) {
    let line = Line::from(vec![
        Span::styled("< ", Style::default().fg(Color::Gray)),
        Span::styled(
            form.selected_baud().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" >", Style::default().fg(Color::Gray)),
    ]);

    let baud = Paragraph::new(line).block(field_block("Baud rate", form.field == ConnectField::Baud));
    f.render_widget(baud, area);
}

fn render_log_file(f: &mut Frame, area: Rect, form: &ConnectForm) {
    let active = form.field == ConnectField::LogFile;
    let style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(form.log_file.as_str())
        .style(style)
        .block(field_block("Log file", active));
    f.render_widget(input, area);

    if active {
        f.set_cursor(area.x + form.log_file.chars().count() as u16 + 1, area.y + 1);
    }
}

fn render_controls(f: &mut Frame, area: Rect) {
    let controls = Paragraph::new(vec![
        Line::from("Up/Down: field  Left/Right: choose  F5: rescan devices"),
        Line::from("Enter: connect  Esc: cancel"),
    ])
    .style(Style::default().fg(Color::Gray));
    f.render_widget(controls, area);
}
