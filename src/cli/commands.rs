use crate::cli::args::Args;
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::prompt::StdConsole;
use crate::core::resolver::{merge_settings, ConnectionResolver, Resolution};
use crate::core::session::{ConsoleSink, TerminalSession};
use crate::core::shutdown::ShutdownSignal;
use crate::core::terminal::{spawn_command_reader, TextTerminal};
use crate::domain::config::{ConnectionConfig, Settings};
use crate::domain::error::{SerialLoggerError, SerialLoggerResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::{init_logging, LogTarget, EXIT_BANNER};
use crate::infrastructure::serial::{PortEnumerator, SystemPorts};
use std::future::Future;
use std::thread;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

type ResolutionReceiver = oneshot::Receiver<SerialLoggerResult<Resolution>>;

/// Execute the command line
pub async fn execute(args: Args) -> SerialLoggerResult<()> {
    let writer = ConsoleWriter::new();

    if args.list {
        let ports = SystemPorts.available_ports()?;
        writer.write_ports(&ports)?;
        return Ok(());
    }

    let config_manager = ConfigManager::new();
    let file_config = config_manager.load_config(args.config.as_deref())?;
    let settings = merge_settings(&args.to_overrides(), &file_config);

    let log = init_logging(&settings.log_file, args.loglevel.into())?;

    // Ctrl-C at a prompt ends the same way as Ctrl-C in a running session
    let shutdown = ShutdownSignal::new();
    let mut interrupt = watch_interrupt(shutdown.clone());

    let resolution = match resolve_detached(settings, args.interactive()) {
        Ok(pending) => {
            until_interrupted(pending, async {
                let _ = (&mut interrupt).await;
            })
            .await
        }
        Err(e) => Err(e),
    };

    let result = match resolution {
        Ok(Resolution::Ready(connection)) => {
            run_session(connection, log, args.tui, &writer, shutdown).await
        }
        Ok(Resolution::Aborted) => {
            info!("Connection setup aborted");
            Ok(())
        }
        Err(e) => Err(e),
    };

    interrupt.abort();
    log_exit(&result);
    result
}

/// Record the outcome and the exit banner
fn log_exit(result: &SerialLoggerResult<()>) {
    if let Err(e) = result {
        error!("{}", e);
    }
    info!("{}", EXIT_BANNER);
}

/// Resolve the connection on its own thread.
///
/// Not `spawn_blocking`: a prompt blocked on stdin would hold up runtime
/// shutdown after an interrupt.
fn resolve_detached(settings: Settings, interactive: bool) -> SerialLoggerResult<ResolutionReceiver> {
    let (sender, receiver) = oneshot::channel();
    thread::Builder::new()
        .name("connection-setup".to_string())
        .spawn(move || {
            let mut console = StdConsole;
            let ports = SystemPorts;
            let resolution = ConnectionResolver::new(&mut console, &ports).resolve(&settings, interactive);
            let _ = sender.send(resolution);
        })?;
    Ok(receiver)
}

/// Wait for the resolution unless `interrupted` completes first
async fn until_interrupted(
    resolution: ResolutionReceiver,
    interrupted: impl Future<Output = ()>,
) -> SerialLoggerResult<Resolution> {
    tokio::select! {
        result = resolution => result.unwrap_or_else(|_| {
            Err(SerialLoggerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "Connection setup ended without a result",
            )))
        }),
        _ = interrupted => {
            info!("Interrupted during connection setup");
            Ok(Resolution::Aborted)
        }
    }
}

async fn run_session(
    connection: ConnectionConfig,
    log: LogTarget,
    use_tui: bool,
    writer: &ConsoleWriter,
    shutdown: ShutdownSignal,
) -> SerialLoggerResult<()> {
    let session = TerminalSession::open(connection.clone())?;
    if connection.interactive && !use_tui {
        writer.write_message(&format!("Connected to '{}'.\n", connection.port))?;
    }

    let interactive = connection.interactive;
    let outcome = tokio::task::spawn_blocking(move || -> SerialLoggerResult<()> {
        if use_tui {
            return crate::tui::run(session, log, shutdown);
        }

        let mut terminal = TextTerminal::new(session, shutdown);
        if interactive {
            terminal = terminal.with_commands(spawn_command_reader());
        }
        let statistics = terminal.run(&mut ConsoleSink::stdout())?;
        info!(
            "Session ended after {} bytes and {} lines",
            statistics.bytes_received, statistics.lines_logged
        );
        Ok(())
    })
    .await
    .map_err(|e| SerialLoggerError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())));

    outcome??;

    writer.write_message(&format!("\nDisconnected from device '{}'", connection.port))?;
    Ok(())
}

/// Clear `shutdown` on Ctrl-C. The task only completes on an actual interrupt.
fn watch_interrupt(shutdown: ShutdownSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupted");
                shutdown.trigger();
            }
            Err(e) => {
                error!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::build_subscriber;
    use clap::Parser;
    use std::collections::VecDeque;
    use std::fs;
    use std::io::{self, Read};
    use tempfile::TempDir;
    use tracing_subscriber::filter::LevelFilter;

    #[tokio::test]
    async fn test_interrupt_during_setup_aborts() {
        let (_sender, pending) = oneshot::channel();
        let resolution = until_interrupted(pending, async {}).await.unwrap();
        assert_eq!(resolution, Resolution::Aborted);
    }

    #[tokio::test]
    async fn test_setup_result_without_interrupt() {
        let (sender, pending) = oneshot::channel();
        let connection = ConnectionConfig::new("/dev/ttyUSB0", 9600);
        sender.send(Ok(Resolution::Ready(connection.clone()))).unwrap();

        let resolution = until_interrupted(pending, std::future::pending()).await.unwrap();
        assert_eq!(resolution, Resolution::Ready(connection));
    }

    #[tokio::test]
    async fn test_setup_thread_gone_is_error() {
        let (sender, pending) = oneshot::channel::<SerialLoggerResult<Resolution>>();
        drop(sender);

        let err = until_interrupted(pending, std::future::pending()).await.unwrap_err();
        assert!(err.to_string().contains("without a result"));
    }

    /// Hands out scripted chunks and raises the interrupt with the last one
    struct InterruptedDevice {
        chunks: VecDeque<&'static [u8]>,
        interrupt: ShutdownSignal,
    }

    impl Read for InterruptedDevice {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let Some(chunk) = self.chunks.pop_front() else {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "no data"));
            };
            if self.chunks.is_empty() {
                self.interrupt.trigger();
            }
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_interrupt_mid_stream_closes_and_logs_exit() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("session.log");
        let subscriber = build_subscriber(LogTarget::open(&log_path).unwrap(), LevelFilter::INFO);

        let shutdown = ShutdownSignal::new();
        let device = InterruptedDevice {
            chunks: VecDeque::from([&b"line\r\n"[..], &b"part"[..]]),
            interrupt: shutdown.clone(),
        };

        let (statistics, echoed) = tracing::subscriber::with_default(subscriber, || {
            let session = TerminalSession::attach(ConnectionConfig::new("/dev/ttyINT", 9600), Box::new(device));
            let mut sink = ConsoleSink::new(Vec::new());
            let statistics = TextTerminal::new(session, shutdown.clone()).run(&mut sink).unwrap();
            log_exit(&Ok(()));
            (statistics, sink.into_inner())
        });

        assert!(!shutdown.is_running());
        assert_eq!(echoed, b"line\r\npart");
        assert_eq!(statistics.lines_logged, 2);

        let log = fs::read_to_string(&log_path).unwrap();
        let messages: Vec<&str> = log
            .lines()
            .map(|line| line.splitn(4, ' ').nth(3).unwrap_or_default())
            .collect();
        let line_at = messages.iter().position(|m| *m == "line").unwrap();
        let part_at = messages.iter().position(|m| *m == "part").unwrap();
        assert!(line_at < part_at);
        assert!(messages[part_at..].iter().any(|m| m.starts_with("Disconnected from device '/dev/ttyINT'")));
        assert_eq!(messages.last(), Some(&EXIT_BANNER));
    }

    #[tokio::test]
    async fn test_missing_config_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let args = Args::try_parse_from([
            "serial-logger",
            "-c",
            temp_dir.path().join("absent.toml").to_str().unwrap(),
            "--non-interactive",
        ])
        .unwrap();

        let err = execute(args).await.unwrap_err();
        assert!(matches!(err, SerialLoggerError::Config { .. }));
    }

    #[tokio::test]
    async fn test_unparseable_config_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[DEFAULT\nbaud = ").unwrap();

        let args = Args::try_parse_from([
            "serial-logger",
            "-c",
            config_path.to_str().unwrap(),
            "--non-interactive",
        ])
        .unwrap();

        let err = execute(args).await.unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
