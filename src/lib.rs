//! Serial Logger Library
//!
//! Serial port terminal that echoes a device's output and records every
//! received line to a timestamped log file.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod tui;

pub use core::resolver::{ConnectionResolver, Resolution};
pub use core::session::{LineBuffer, SessionState, TerminalSession};
pub use domain::config::{ConnectionConfig, Settings};
pub use domain::error::{SerialLoggerError, SerialLoggerResult};
