use crate::core::command::{execute, TerminalCommand};
use crate::core::session::{ReadOutcome, SessionStatistics, Sink, TerminalSession};
use crate::core::shutdown::ShutdownSignal;
use crate::domain::error::SerialLoggerResult;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::{debug, info};

/// Text-mode driver: echoes the device to a sink and answers typed commands
pub struct TextTerminal {
    session: TerminalSession,
    shutdown: ShutdownSignal,
    commands: Option<Receiver<String>>,
}

impl TextTerminal {
    pub fn new(session: TerminalSession, shutdown: ShutdownSignal) -> Self {
        Self {
            session,
            shutdown,
            commands: None,
        }
    }

    /// Accept command lines from `commands` between reads
    pub fn with_commands(mut self, commands: Receiver<String>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Run until exit, interrupt or end of stream. The session is closed on
    /// every path out, including errors.
    pub fn run(mut self, sink: &mut dyn Sink) -> SerialLoggerResult<SessionStatistics> {
        debug!(
            "Starting terminal in {} mode",
            if self.commands.is_some() { "interactive" } else { "non-interactive" }
        );

        let result = self.pump(sink);
        self.session.close();
        result.map(|_| self.session.statistics())
    }

    fn pump(&mut self, sink: &mut dyn Sink) -> SerialLoggerResult<()> {
        while self.shutdown.is_running() {
            self.handle_commands(sink)?;
            if !self.shutdown.is_running() {
                break;
            }

            if self.session.read_step(sink)? == ReadOutcome::EndOfStream {
                info!("Device '{}' closed the stream", self.session.config().port);
                break;
            }
        }
        Ok(())
    }

    fn handle_commands(&mut self, sink: &mut dyn Sink) -> SerialLoggerResult<()> {
        let mut pending = Vec::new();
        let mut input_closed = false;

        if let Some(commands) = &self.commands {
            loop {
                match commands.try_recv() {
                    Ok(line) => pending.push(line),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        input_closed = true;
                        break;
                    }
                }
            }
        }

        if input_closed {
            debug!("Command input closed");
            self.commands = None;
        }

        for line in pending {
            let command = TerminalCommand::parse(&line);
            let outcome = execute(&command, self.session.config());
            if let Some(output) = outcome.output {
                sink.accept(format!("{}\n", output).as_bytes())?;
            }
            if outcome.exit {
                self.shutdown.trigger();
                break;
            }
        }
        Ok(())
    }
}

/// Forward stdin lines on a detached thread. The thread never blocks exit.
pub fn spawn_command_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}
