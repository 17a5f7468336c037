use crate::domain::error::SerialLoggerResult;
use serialport::SerialPortType;
use tabled::Tabled;
use tracing::debug;

/// A serial device found on the host
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct PortInfo {
    #[tabled(rename = "Port")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub description: String,
}

impl PortInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Source of the host's serial device list
pub trait PortEnumerator {
    fn available_ports(&self) -> SerialLoggerResult<Vec<PortInfo>>;
}

/// Enumerates real devices through `serialport`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPorts;

impl PortEnumerator for SystemPorts {
    fn available_ports(&self) -> SerialLoggerResult<Vec<PortInfo>> {
        let ports = serialport::available_ports().map_err(|e| {
            crate::domain::error::SerialLoggerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to list serial ports: {}", e),
            ))
        })?;

        debug!("Found {} serial ports", ports.len());

        Ok(ports
            .into_iter()
            .map(|port| PortInfo::new(port.port_name, describe(&port.port_type)))
            .collect())
    }
}

fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let mut text = format!("USB {:04x}:{:04x}", usb.vid, usb.pid);
            if let Some(product) = &usb.product {
                text.push(' ');
                text.push_str(product);
            }
            text
        }
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "Unknown".to_string(),
    }
}
