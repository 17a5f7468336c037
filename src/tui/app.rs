use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::{
    controller::Controller,
    event::{AppEvent, EventHandler},
    ui::draw_ui,
    worker::READ_POLL_INTERVAL,
};
use crate::{
    core::{session::TerminalSession, shutdown::ShutdownSignal},
    domain::error::{SerialLoggerError, SerialLoggerResult},
    infrastructure::{logging::LogTarget, serial::SystemPorts},
};

/// Redraw and input poll period
pub const UI_TICK: Duration = Duration::from_millis(16);

fn tui_error(e: io::Error) -> SerialLoggerError {
    SerialLoggerError::Tui(e.to_string())
}

/// Run `setup`; if it fails, run `restore` before handing back the error
fn undo_on_error<T>(setup: impl FnOnce() -> io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    setup().map_err(|e| {
        restore();
        e
    })
}

fn enter_terminal() -> SerialLoggerResult<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().map_err(tui_error)?;
    undo_on_error(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )
    .map_err(tui_error)
}

pub struct App {
    controller: Controller,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    shutdown: ShutdownSignal,
    handler: EventHandler,
    tick_rate: Duration,
}

impl App {
    /// Start reading from an open session and take over the terminal
    pub fn new(session: TerminalSession, log: LogTarget, shutdown: ShutdownSignal) -> SerialLoggerResult<Self> {
        let controller = Controller::new(
            session,
            log,
            Box::new(SystemPorts),
            Box::new(TerminalSession::open),
            READ_POLL_INTERVAL,
        )?;
        let terminal = enter_terminal()?;

        Ok(Self {
            controller,
            terminal,
            shutdown,
            handler: EventHandler::new(),
            tick_rate: UI_TICK,
        })
    }

    pub fn run(&mut self) -> SerialLoggerResult<()> {
        while self.shutdown.is_running() {
            if event::poll(self.tick_rate).map_err(tui_error)? {
                if let Event::Key(key) = event::read().map_err(tui_error)? {
                    if key.kind == KeyEventKind::Press {
                        match self.handler.handle_key_event(key, &mut self.controller.state) {
                            Some(AppEvent::Quit) => break,
                            Some(event) => self.controller.handle(event),
                            None => {}
                        }
                    }
                }
            }

            self.controller.tick();

            let state = &self.controller.state;
            self.terminal
                .draw(|f| draw_ui(f, state))
                .map_err(tui_error)?;
        }

        self.controller.shutdown();
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.controller.shutdown();

        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
