use crate::core::session::{
    line_buffer::LineBuffer,
    sink::Sink,
    state::{SessionState, SessionStatistics},
};
use crate::domain::{
    config::ConnectionConfig,
    error::{SerialLoggerError, SerialLoggerResult},
};
use crate::infrastructure::serial::SerialClient;
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

const READ_CHUNK_SIZE: usize = 64;

/// Result of a single read from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes arrived; `lines` holds every line they completed
    Data { bytes: usize, lines: Vec<String> },
    /// The read timed out with nothing received
    Timeout,
    /// The device reported end of stream
    EndOfStream,
}

/// One connection to a serial device.
///
/// Owns the device handle and the line buffer. Every completed line is logged
/// at `INFO`; every received chunk is echoed to the caller's sink.
pub struct TerminalSession {
    config: ConnectionConfig,
    state: SessionState,
    reader: Option<Box<dyn Read + Send>>,
    line: LineBuffer,
    statistics: SessionStatistics,
}

impl TerminalSession {
    /// Open the configured device
    pub fn open(config: ConnectionConfig) -> SerialLoggerResult<Self> {
        let client = SerialClient::open(&config)?;
        Ok(Self::attach(config, Box::new(client)))
    }

    /// Wrap an already-open byte source
    pub fn attach(config: ConnectionConfig, reader: Box<dyn Read + Send>) -> Self {
        Self {
            config,
            state: SessionState::Connected,
            reader: Some(reader),
            line: LineBuffer::new(),
            statistics: SessionStatistics::default(),
        }
    }

    /// A session that has not opened anything
    pub fn disconnected(config: ConnectionConfig) -> Self {
        Self {
            config,
            state: SessionState::Disconnected,
            reader: None,
            line: LineBuffer::new(),
            statistics: SessionStatistics::default(),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn statistics(&self) -> SessionStatistics {
        self.statistics
    }

    /// Text received since the last newline
    pub fn pending_line(&self) -> &str {
        self.line.as_str()
    }

    /// Read once (blocking up to the configured timeout) and dispatch what arrived
    pub fn read_step(&mut self, sink: &mut dyn Sink) -> SerialLoggerResult<ReadOutcome> {
        if !self.state.is_connected() {
            return Err(SerialLoggerError::DeviceNotConnected);
        }
        let reader = self
            .reader
            .as_mut()
            .ok_or(SerialLoggerError::DeviceNotConnected)?;

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let count = match reader.read(&mut chunk) {
            Ok(0) => return Ok(ReadOutcome::EndOfStream),
            Ok(count) => count,
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                return Ok(ReadOutcome::Timeout);
            }
            Err(e) => return Err(SerialLoggerError::Io(e)),
        };

        let data = &chunk[..count];
        self.statistics.bytes_received += count as u64;
        sink.accept(data)?;

        let lines = self.line.extend(data);
        for line in &lines {
            info!("{}", line);
        }
        self.statistics.lines_logged += lines.len() as u64;

        Ok(ReadOutcome::Data { bytes: count, lines })
    }

    /// Read until `running` is cleared or the device ends the stream.
    ///
    /// The flag is checked between reads, so a read in progress finishes (or
    /// times out) before the loop stops.
    pub fn run(&mut self, sink: &mut dyn Sink, running: &AtomicBool) -> SerialLoggerResult<()> {
        while running.load(Ordering::SeqCst) {
            if self.read_step(sink)? == ReadOutcome::EndOfStream {
                info!("Device '{}' closed the stream", self.config.port);
                break;
            }
        }
        Ok(())
    }

    /// Release the device. Safe to call any number of times.
    pub fn close(&mut self) {
        if !self.state.can_transition_to(SessionState::Closed) {
            return;
        }

        if let Some(line) = self.line.take_pending() {
            info!("{}", line);
            self.statistics.lines_logged += 1;
        }

        if self.reader.take().is_some() {
            info!(
                "Disconnected from device '{}' ({} bytes, {} lines)",
                self.config.port, self.statistics.bytes_received, self.statistics.lines_logged
            );
        } else {
            debug!("Closing session for '{}' that never connected", self.config.port);
        }

        self.state = SessionState::Closed;
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.close();
    }
}
