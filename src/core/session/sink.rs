use crate::domain::error::{SerialLoggerError, SerialLoggerResult};
use std::io::{self, Write};
use tokio::sync::mpsc;

/// Destination for echoed device output
pub trait Sink: Send {
    /// Take the next bytes read from the device, exactly as received
    fn accept(&mut self, bytes: &[u8]) -> SerialLoggerResult<()>;
}

/// Writes straight to a console stream, flushing every chunk
pub struct ConsoleSink<W: Write + Send> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn accept(&mut self, bytes: &[u8]) -> SerialLoggerResult<()> {
        self.out.write_all(bytes)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Items passed from the reader worker to the display thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Echoed device output
    Text(String),
    /// Status line update
    Status(String),
    /// The worker closed its session
    Disconnected,
}

/// Queues echoed output for another thread to render.
///
/// A UTF-8 sequence cut off at the end of a chunk is held back until the
/// next chunk completes it. Invalid bytes become U+FFFD.
pub struct QueueSink {
    sender: mpsc::UnboundedSender<DisplayEvent>,
    pending: Vec<u8>,
}

impl QueueSink {
    pub fn new(sender: mpsc::UnboundedSender<DisplayEvent>) -> Self {
        Self {
            sender,
            pending: Vec::new(),
        }
    }
}

impl Sink for QueueSink {
    fn accept(&mut self, bytes: &[u8]) -> SerialLoggerResult<()> {
        self.pending.extend_from_slice(bytes);
        let text = decode_complete(&mut self.pending);
        if text.is_empty() {
            return Ok(());
        }

        self.sender
            .send(DisplayEvent::Text(text))
            .map_err(|_| SerialLoggerError::Output("Display queue closed".to_string()))
    }
}

/// Decode the complete characters at the front of `pending`, leaving an
/// unfinished trailing sequence in place
fn decode_complete(pending: &mut Vec<u8>) -> String {
    let mut text = String::new();
    loop {
        match std::str::from_utf8(&pending[..]) {
            Ok(valid) => {
                text.push_str(valid);
                pending.clear();
                return text;
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                text.push_str(&String::from_utf8_lossy(&pending[..valid_up_to]));
                match e.error_len() {
                    Some(invalid) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        pending.drain(..valid_up_to + invalid);
                    }
                    None => {
                        pending.drain(..valid_up_to);
                        return text;
                    }
                }
            }
        }
    }
}
