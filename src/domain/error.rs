use thiserror::Error;

/// Serial logger unified error type
#[derive(Error, Debug)]
pub enum SerialLoggerError {
    #[error("Missing required argument '{0}'")]
    MissingArgument(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to connect to '{port}': {source}")]
    Connection {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Device not connected")]
    DeviceNotConnected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Terminal UI error: {0}")]
    Tui(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl SerialLoggerError {
    /// Name of the missing field, when this is a `MissingArgument`
    pub fn missing_field(&self) -> Option<&str> {
        match self {
            SerialLoggerError::MissingArgument(field) => Some(field),
            _ => None,
        }
    }
}

pub type SerialLoggerResult<T> = Result<T, SerialLoggerError>;

/// Recoverable problem with a user-supplied connection parameter.
///
/// Interactive resolution reports these and asks again; they only become
/// fatal when there is nobody to ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    InvalidBaud(String),
    NoSuchDevice(String),
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::InvalidBaud(value) => write!(f, "Invalid baud rate '{}'", value),
            ValidationWarning::NoSuchDevice(path) => write!(f, "No such device '{}'", path),
        }
    }
}
