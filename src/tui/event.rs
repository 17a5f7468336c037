use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::form::ConnectRequest;
use super::state::AppState;

/// Lines moved by PageUp/PageDown
const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ToggleConnection,
    /// Open the connect popup with a fresh device list
    OpenConnectForm,
    RefreshPorts,
    Connect(ConnectRequest),
}

pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Apply view-only keys to `state`; return the ones the app must act on
    pub fn handle_key_event(&self, key: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppEvent::Quit);
        }

        if state.connect_form.is_some() {
            return self.handle_form_key(key, state);
        }

        if state.show_help {
            match key.code {
                KeyCode::Char('h') | KeyCode::Esc => state.toggle_help(),
                KeyCode::Char('q') => return Some(AppEvent::Quit),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppEvent::Quit),
            KeyCode::Char('d') => return Some(AppEvent::ToggleConnection),
            KeyCode::Char('p') => return Some(AppEvent::OpenConnectForm),
            KeyCode::Char('h') => state.toggle_help(),
            KeyCode::Char('c') => state.clear_terminal(),
            KeyCode::Char('a') => state.toggle_autoscroll(),
            KeyCode::Up | KeyCode::Char('k') => state.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => state.scroll_down(1),
            KeyCode::PageUp => state.scroll_up(PAGE_SIZE),
            KeyCode::PageDown => state.scroll_down(PAGE_SIZE),
            KeyCode::End => state.scroll_down(usize::MAX),
            _ => {}
        }
        None
    }

    fn handle_form_key(&self, key: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        let form = state.connect_form.as_mut()?;
        match key.code {
            KeyCode::Esc => state.connect_form = None,
            KeyCode::Enter => match form.request() {
                Ok(request) => {
                    state.connect_form = None;
                    return Some(AppEvent::Connect(request));
                }
                Err(message) => state.set_status_message(message),
            },
            KeyCode::F(5) => return Some(AppEvent::RefreshPorts),
            KeyCode::Down | KeyCode::Tab => form.next_field(),
            KeyCode::Up | KeyCode::BackTab => form.previous_field(),
            KeyCode::Right => form.next_choice(),
            KeyCode::Left => form.previous_choice(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.input_char(c),
            _ => {}
        }
        None
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ConnectionConfig;
    use crate::infrastructure::serial::PortInfo;
    use crate::tui::form::{ConnectField, ConnectForm};
    use std::path::{Path, PathBuf};

    fn state() -> AppState {
        AppState::new(&ConnectionConfig::new("/dev/ttyUSB0", 115200), PathBuf::from("test.log"))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        let handler = EventHandler::new();
        let mut state = state();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('q')), &mut state), Some(AppEvent::Quit));
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc), &mut state), Some(AppEvent::Quit));
        assert_eq!(
            handler.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut state),
            Some(AppEvent::Quit)
        );
    }

    #[test]
    fn test_view_keys_update_state() {
        let handler = EventHandler::new();
        let mut state = state();
        state.push_text("a\nb\nc\n");

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('a')), &mut state), None);
        assert!(!state.autoscroll);

        handler.handle_key_event(press(KeyCode::Up), &mut state);
        assert_eq!(state.scroll_offset, 1);
        handler.handle_key_event(press(KeyCode::End), &mut state);
        assert_eq!(state.scroll_offset, 0);

        handler.handle_key_event(press(KeyCode::Char('c')), &mut state);
        assert!(state.lines.is_empty());
    }

    #[test]
    fn test_help_swallows_other_keys() {
        let handler = EventHandler::new();
        let mut state = state();

        handler.handle_key_event(press(KeyCode::Char('h')), &mut state);
        assert!(state.show_help);
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('d')), &mut state), None);

        handler.handle_key_event(press(KeyCode::Esc), &mut state);
        assert!(!state.show_help);
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('d')), &mut state),
            Some(AppEvent::ToggleConnection)
        );
    }

    fn open_form(state: &mut AppState) {
        state.connect_form = Some(ConnectForm::new(
            vec![PortInfo::new("/dev/ttyUSB0", "USB"), PortInfo::new("/dev/ttyUSB1", "USB")],
            "/dev/ttyUSB0",
            115200,
            Path::new("test.log"),
        ));
    }

    #[test]
    fn test_p_requests_connect_form() {
        let handler = EventHandler::new();
        let mut state = state();
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('p')), &mut state),
            Some(AppEvent::OpenConnectForm)
        );
    }

    #[test]
    fn test_form_keys_edit_form_not_view() {
        let handler = EventHandler::new();
        let mut state = state();
        open_form(&mut state);

        // q and c are text here, not quit and clear
        state.push_text("kept\n");
        handler.handle_key_event(press(KeyCode::Up), &mut state);
        assert_eq!(state.connect_form.as_ref().map(|form| form.field), Some(ConnectField::LogFile));
        assert_eq!(handler.handle_key_event(press(KeyCode::Backspace), &mut state), None);
        for c in ['q', 'c'] {
            assert_eq!(handler.handle_key_event(press(KeyCode::Char(c)), &mut state), None);
        }
        assert_eq!(state.lines.len(), 1);

        handler.handle_key_event(press(KeyCode::Down), &mut state);
        handler.handle_key_event(press(KeyCode::Right), &mut state);
        assert_eq!(
            handler.handle_key_event(press(KeyCode::F(5)), &mut state),
            Some(AppEvent::RefreshPorts)
        );

        let event = handler.handle_key_event(press(KeyCode::Enter), &mut state);
        assert_eq!(
            event,
            Some(AppEvent::Connect(ConnectRequest {
                port: "/dev/ttyUSB1".to_string(),
                baud_rate: 115200,
                log_file: PathBuf::from("test.loqc"),
            }))
        );
        assert!(state.connect_form.is_none());
    }

    #[test]
    fn test_form_escape_and_invalid_enter() {
        let handler = EventHandler::new();
        let mut state = state();
        open_form(&mut state);
        if let Some(form) = state.connect_form.as_mut() {
            form.log_file.clear();
        }

        assert_eq!(handler.handle_key_event(press(KeyCode::Enter), &mut state), None);
        assert!(state.connect_form.is_some());
        assert_eq!(state.status_message.as_deref(), Some("Log file path is empty"));

        assert_eq!(handler.handle_key_event(press(KeyCode::Esc), &mut state), None);
        assert!(state.connect_form.is_none());
    }
}
