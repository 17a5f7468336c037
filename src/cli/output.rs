use crate::infrastructure::serial::PortInfo;
use std::io::{self, Write};
use tabled::{settings::Style, Table};

/// Writes user-facing results to the console
pub trait OutputWriter {
    fn write_ports(&self, ports: &[PortInfo]) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::SerialLoggerError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Render the port list as a table
pub fn ports_table(ports: &[PortInfo]) -> String {
    Table::new(ports).with(Style::modern()).to_string()
}

/// Console output writer
#[derive(Debug, Default)]
pub struct ConsoleWriter;

impl ConsoleWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_ports(&self, ports: &[PortInfo]) -> Result<(), OutputError> {
        let mut stdout = io::stdout().lock();
        if ports.is_empty() {
            writeln!(stdout, "There are no available serial ports.")?;
        } else {
            writeln!(stdout, "{}", ports_table(ports))?;
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        writeln!(io::stdout().lock(), "{}", message)?;
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        writeln!(io::stderr().lock(), "Error: {}", error)?;
        Ok(())
    }
}
