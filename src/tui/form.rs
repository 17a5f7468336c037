use std::path::{Path, PathBuf};

use crate::domain::config::COMMON_BAUD_RATES;
use crate::infrastructure::serial::PortInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectField {
    Port,
    Baud,
    LogFile,
}

impl ConnectField {
    fn next(self) -> Self {
        match self {
            ConnectField::Port => ConnectField::Baud,
            ConnectField::Baud => ConnectField::LogFile,
            ConnectField::LogFile => ConnectField::Port,
        }
    }

    fn previous(self) -> Self {
        match self {
            ConnectField::Port => ConnectField::LogFile,
            ConnectField::Baud => ConnectField::Port,
            ConnectField::LogFile => ConnectField::Baud,
        }
    }
}

/// Values chosen in the connect popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub port: String,
    pub baud_rate: u32,
    pub log_file: PathBuf,
}

/// Connect popup: device list, baud list and log file path
#[derive(Debug, Clone)]
pub struct ConnectForm {
    pub ports: Vec<PortInfo>,
    pub port_index: usize,
    pub baud_rates: Vec<u32>,
    pub baud_index: usize,
    pub log_file: String,
    pub field: ConnectField,
}

impl ConnectForm {
    /// Preselects the current port and baud rate when they are in the lists
    pub fn new(ports: Vec<PortInfo>, current_port: &str, current_baud: u32, log_file: &Path) -> Self {
        let mut baud_rates = COMMON_BAUD_RATES.to_vec();
        if !baud_rates.contains(&current_baud) {
            baud_rates.push(current_baud);
            baud_rates.sort_unstable();
        }
        let baud_index = baud_rates
            .iter()
            .position(|&baud| baud == current_baud)
            .unwrap_or(0);

        let mut form = Self {
            ports: Vec::new(),
            port_index: 0,
            baud_rates,
            baud_index,
            log_file: log_file.display().to_string(),
            field: ConnectField::Port,
        };
        form.set_ports(ports, current_port);
        form
    }

    /// Replace the device list, keeping `preferred` selected if it is still there
    pub fn set_ports(&mut self, ports: Vec<PortInfo>, preferred: &str) {
        self.port_index = ports.iter().position(|port| port.name == preferred).unwrap_or(0);
        self.ports = ports;
    }

    /// Refresh the device list and keep the current choice
    pub fn refresh_ports(&mut self, ports: Vec<PortInfo>) {
        let selected = self.selected_port().map(|port| port.name.clone()).unwrap_or_default();
        self.set_ports(ports, &selected);
    }

    pub fn selected_port(&self) -> Option<&PortInfo> {
        self.ports.get(self.port_index)
    }

    pub fn selected_baud(&self) -> u32 {
        self.baud_rates[self.baud_index]
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn previous_field(&mut self) {
        self.field = self.field.previous();
    }

    pub fn next_choice(&mut self) {
        match self.field {
            ConnectField::Port if !self.ports.is_empty() => {
                self.port_index = (self.port_index + 1) % self.ports.len();
            }
            ConnectField::Baud => {
                self.baud_index = (self.baud_index + 1) % self.baud_rates.len();
            }
            _ => {}
        }
    }

    pub fn previous_choice(&mut self) {
        match self.field {
            ConnectField::Port if !self.ports.is_empty() => {
                self.port_index = (self.port_index + self.ports.len() - 1) % self.ports.len();
            }
            ConnectField::Baud => {
                self.baud_index = (self.baud_index + self.baud_rates.len() - 1) % self.baud_rates.len();
            }
            _ => {}
        }
    }

    /// Typed characters only edit the log file path
    pub fn input_char(&mut self, c: char) {
        if self.field == ConnectField::LogFile {
            self.log_file.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.field == ConnectField::LogFile {
            self.log_file.pop();
        }
    }

    /// The chosen values, or the message to show when they are incomplete
    pub fn request(&self) -> Result<ConnectRequest, String> {
        let port = self
            .selected_port()
            .ok_or_else(|| "No serial ports found. Press F5 to refresh.".to_string())?;

        let log_file = self.log_file.trim();
        if log_file.is_empty() {
            return Err("Log file path is empty".to_string());
        }

        Ok(ConnectRequest {
            port: port.name.clone(),
            baud_rate: self.selected_baud(),
            log_file: PathBuf::from(log_file),
        })
    }
}
