// TUI module - Full-screen terminal with a background reader

pub mod app;
pub mod controller;
pub mod event;
pub mod form;
pub mod link;
pub mod state;
pub mod ui;
pub mod widgets;
pub mod worker;

use crate::core::{session::TerminalSession, shutdown::ShutdownSignal};
use crate::domain::error::SerialLoggerResult;
use crate::infrastructure::logging::LogTarget;

pub use app::App;
pub use link::{DeviceLink, LinkStatus};
pub use worker::ReaderWorker;

/// Run the full-screen terminal until quit or interrupt
pub fn run(session: TerminalSession, log: LogTarget, shutdown: ShutdownSignal) -> SerialLoggerResult<()> {
    let mut app = App::new(session, log, shutdown)?;
    app.run()
}
