use crate::core::session::{DisplayEvent, QueueSink, ReadOutcome, TerminalSession};
use crate::core::shutdown::ShutdownSignal;
use crate::domain::error::SerialLoggerResult;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Delay between serial reads on the worker thread
pub const READ_POLL_INTERVAL: Duration = Duration::from_micros(200);

/// Thread that owns a session and feeds its output to the display queue.
///
/// Stopping is cooperative: a read already in progress finishes or times out
/// first. `request_stop` returns at once; `stop` also waits for the thread.
pub struct ReaderWorker {
    shutdown: ShutdownSignal,
    handle: Option<JoinHandle<()>>,
}

impl ReaderWorker {
    pub fn spawn(
        mut session: TerminalSession,
        events: mpsc::UnboundedSender<DisplayEvent>,
        poll_interval: Duration,
    ) -> SerialLoggerResult<Self> {
        let shutdown = ShutdownSignal::new();
        let worker_shutdown = shutdown.clone();
        let port = session.config().port.clone();

        let handle = thread::Builder::new()
            .name("serial-reader".to_string())
            .spawn(move || {
                let mut sink = QueueSink::new(events.clone());

                while worker_shutdown.is_running() {
                    thread::sleep(poll_interval);

                    match session.read_step(&mut sink) {
                        Ok(ReadOutcome::EndOfStream) => {
                            info!("Device '{}' closed the stream", port);
                            let _ = events.send(DisplayEvent::Status(format!(
                                "Device '{}' closed the connection",
                                port
                            )));
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("Reading from '{}' failed: {}", port, e);
                            let _ = events.send(DisplayEvent::Status(format!("Read error: {}", e)));
                            break;
                        }
                    }
                }

                session.close();
                let _ = events.send(DisplayEvent::Disconnected);
                debug!("Reader worker for '{}' finished", port);
            })?;

        Ok(Self {
            shutdown,
            handle: Some(handle),
        })
    }

    /// Whether a stop has been requested
    pub fn is_stopping(&self) -> bool {
        !self.shutdown.is_running()
    }

    /// Ask the thread to stop without waiting. It posts `Disconnected` once
    /// the read in progress has returned.
    pub fn request_stop(&self) {
        self.shutdown.trigger();
    }

    /// Ask the thread to stop and wait for it
    pub fn stop(&mut self) {
        self.shutdown.trigger();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Reader worker panicked");
            }
        }
    }
}

impl Drop for ReaderWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
