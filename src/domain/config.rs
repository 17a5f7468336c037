use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LOG_FILE: &str = "serial_logger.log";

/// Baud rates offered as shortcuts by the terminal UI. Any positive rate is valid.
pub const COMMON_BAUD_RATES: [u32; 16] = [
    9600, 14400, 19200, 28800, 38400, 57600, 102400, 115200, 128000, 230400, 256000, 460800,
    512000, 921600, 1843200, 2048000,
];

/// Validated parameters for one serial connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Device path or id
    pub port: String,
    /// Baud rate, always positive
    pub baud_rate: u32,
    /// Read timeout
    pub timeout: Duration,
    /// Whether a user is available to answer prompts and type commands
    pub interactive: bool,
}

impl ConnectionConfig {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            interactive: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// Contents of a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(rename = "DEFAULT", default)]
    pub defaults: DefaultSection,
}

/// The `[DEFAULT]` table. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logfile: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baud: Option<ConfigValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<ConfigValue>,
}

/// A scalar that may be written either as a number or as a string.
///
/// Values are kept raw here and validated later, so `baud = "fast"` is reported
/// the same way as a bad value typed at the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ConfigValue {
    pub fn as_raw(&self) -> String {
        match self {
            ConfigValue::Integer(value) => value.to_string(),
            ConfigValue::Float(value) => value.to_string(),
            ConfigValue::Text(value) => value.trim().to_string(),
        }
    }
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub device: Option<String>,
    pub baud: Option<u32>,
    pub timeout: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Merged settings before device and baud validation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub device: Option<String>,
    pub baud: Option<String>,
    pub timeout: Duration,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: None,
            baud: Some(DEFAULT_BAUD_RATE.to_string()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}
