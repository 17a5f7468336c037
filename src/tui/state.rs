use std::collections::VecDeque;
use std::path::PathBuf;

use super::form::ConnectForm;
use super::link::LinkStatus;
use crate::core::session::DisplayEvent;
use crate::domain::config::ConnectionConfig;

/// Lines kept in the terminal pane
pub const MAX_SCROLLBACK: usize = 5000;

#[derive(Debug)]
pub struct AppState {
    pub port: String,
    pub baud_rate: u32,
    pub log_file: PathBuf,
    pub link: LinkStatus,
    pub lines: VecDeque<String>,
    pub partial: String,
    pub autoscroll: bool,
    /// Lines scrolled up from the bottom
    pub scroll_offset: usize,
    pub status_message: Option<String>,
    pub show_help: bool,
    /// Open connect popup
    pub connect_form: Option<ConnectForm>,
}

impl AppState {
    pub fn new(connection: &ConnectionConfig, log_file: PathBuf) -> Self {
        Self {
            port: connection.port.clone(),
            baud_rate: connection.baud_rate,
            log_file,
            link: LinkStatus::Disconnected,
            lines: VecDeque::new(),
            partial: String::new(),
            autoscroll: true,
            scroll_offset: 0,
            status_message: Some("Press 'h' for help.".to_string()),
            show_help: false,
            connect_form: None,
        }
    }

    pub fn apply(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::Text(text) => {
                self.push_text(&text);
            }
            DisplayEvent::Status(message) => self.set_status_message(message),
            DisplayEvent::Disconnected => self.link = LinkStatus::Disconnected,
        }
    }

    /// Append echoed output, returning how many lines it completed
    pub fn push_text(&mut self, text: &str) -> usize {
        let mut completed = 0;
        for ch in text.chars() {
            match ch {
                '\n' => {
                    self.lines.push_back(std::mem::take(&mut self.partial));
                    completed += 1;
                }
                '\r' => {}
                _ => self.partial.push(ch),
            }
        }

        while self.lines.len() > MAX_SCROLLBACK {
            self.lines.pop_front();
        }

        if self.autoscroll {
            self.scroll_offset = 0;
        } else {
            self.scroll_offset = (self.scroll_offset + completed).min(self.max_scroll());
        }
        completed
    }

    pub fn clear_terminal(&mut self) {
        self.lines.clear();
        self.partial.clear();
        self.scroll_offset = 0;
    }

    pub fn toggle_autoscroll(&mut self) {
        self.autoscroll = !self.autoscroll;
        if self.autoscroll {
            self.scroll_offset = 0;
        }
        let state = if self.autoscroll { "on" } else { "off" };
        self.set_status_message(format!("Autoscroll {}", state));
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(self.max_scroll());
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// The `height` lines to show, oldest first, ending with the partial line
    pub fn visible_lines(&self, height: usize) -> Vec<&str> {
        let mut all: Vec<&str> = self.lines.iter().map(String::as_str).collect();
        if !self.partial.is_empty() {
            all.push(&self.partial);
        }

        let end = all.len().saturating_sub(self.scroll_offset);
        let start = end.saturating_sub(height);
        all[start..end].to_vec()
    }

    fn max_scroll(&self) -> usize {
        self.lines.len() + usize::from(!self.partial.is_empty())
    }
}
