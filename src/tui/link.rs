use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use super::worker::ReaderWorker;
use crate::core::session::{DisplayEvent, TerminalSession};
use crate::domain::error::{SerialLoggerError, SerialLoggerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Connected,
    /// Stop requested, waiting for the reader to report `Disconnected`
    Disconnecting,
    Disconnected,
}

/// Owns the reader worker and its display queue.
///
/// Nothing here waits on the reader except `shutdown`. A disconnect only
/// raises the stop flag; the worker is reaped when its `Disconnected` event
/// comes through `drain`, and a new session can be attached after that.
pub struct DeviceLink {
    worker: Option<ReaderWorker>,
    events_tx: mpsc::UnboundedSender<DisplayEvent>,
    events_rx: mpsc::UnboundedReceiver<DisplayEvent>,
    poll_interval: Duration,
}

impl DeviceLink {
    pub fn new(poll_interval: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            worker: None,
            events_tx,
            events_rx,
            poll_interval,
        }
    }

    pub fn status(&self) -> LinkStatus {
        match &self.worker {
            None => LinkStatus::Disconnected,
            Some(worker) if worker.is_stopping() => LinkStatus::Disconnecting,
            Some(_) => LinkStatus::Connected,
        }
    }

    /// Start reading from `session`. Refused while a worker is still alive.
    pub fn attach(&mut self, session: TerminalSession) -> SerialLoggerResult<()> {
        if self.worker.is_some() {
            return Err(SerialLoggerError::Tui(format!(
                "Cannot attach '{}' while a device is still attached",
                session.config().port
            )));
        }

        let worker = ReaderWorker::spawn(session, self.events_tx.clone(), self.poll_interval)?;
        self.worker = Some(worker);
        Ok(())
    }

    pub fn request_disconnect(&mut self) {
        if let Some(worker) = &self.worker {
            worker.request_stop();
        }
    }

    /// Queued events in arrival order
    pub fn drain(&mut self) -> Vec<DisplayEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            if event == DisplayEvent::Disconnected {
                // The thread is past its last read once this arrives
                if let Some(mut worker) = self.worker.take() {
                    worker.stop();
                    debug!("Reader worker reaped");
                }
            }
            events.push(event);
        }
        events
    }

    /// Stop and join the worker, returning whatever it queued last
    pub fn shutdown(&mut self) -> Vec<DisplayEvent> {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
        }
        self.drain()
    }
}
