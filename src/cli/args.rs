use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

use crate::domain::config::CliOverrides;

/// Command line arguments for serial-logger
#[derive(Parser, Debug)]
#[command(
    name = "serial-logger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Serial port terminal that records every received line to a log file",
    long_about = "Connects to a serial device, echoes everything it sends and appends each \
                  received line to a timestamped log. Missing settings are prompted for \
                  unless --non-interactive is given."
)]
pub struct Args {
    /// Device path or id of the serial port
    pub device: Option<String>,

    /// Baud rate for the serial connection [default: 9600]
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// Config file with default values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Serial read timeout in seconds [default: 5]
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Log file to record the session to [default: serial_logger.log]
    #[arg(short, long = "log")]
    pub log: Option<PathBuf>,

    /// Logging level
    #[arg(long, value_enum, ignore_case = true, default_value = "info")]
    pub loglevel: LogLevel,

    /// Never prompt; fail when device or baud rate are missing or invalid
    #[arg(long)]
    pub non_interactive: bool,

    /// Show the session in a full-screen terminal UI
    #[arg(long)]
    pub tui: bool,

    /// List available serial ports and exit
    #[arg(long)]
    pub list: bool,
}

/// Logging level names accepted by --loglevel
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

impl Args {
    /// Settings given explicitly on the command line
    pub fn to_overrides(&self) -> CliOverrides {
        CliOverrides {
            device: self.device.clone(),
            baud: self.baud,
            timeout: self.timeout,
            log_file: self.log.clone(),
        }
    }

    pub fn interactive(&self) -> bool {
        !self.non_interactive
    }
}
