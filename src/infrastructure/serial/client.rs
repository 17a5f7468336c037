use crate::domain::{
    config::ConnectionConfig,
    error::{SerialLoggerError, SerialLoggerResult},
};
use serialport::SerialPort;
use std::io::{self, Read};
use tracing::{debug, error, info};

/// Open serial device, readable as a plain byte stream
pub struct SerialClient {
    port: Box<dyn SerialPort>,
}

impl SerialClient {
    /// Open the device named in `config` (8N1, no flow control).
    pub fn open(config: &ConnectionConfig) -> SerialLoggerResult<Self> {
        debug!("Connecting to '{}' at {} baud", config.port, config.baud_rate);

        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|e| {
                error!("Failed to connect to '{}': {}", config.port, e);
                SerialLoggerError::Connection {
                    port: config.port.clone(),
                    source: e,
                }
            })?;

        info!("Connected to '{}'", config.port);
        Ok(Self { port })
    }
}

impl Read for SerialClient {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}
