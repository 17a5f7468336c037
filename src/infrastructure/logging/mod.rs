// Logging module - Session log file
use crate::domain::error::{SerialLoggerError, SerialLoggerResult};
use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    EnvFilter,
};

pub const START_BANNER: &str = "--------------------- Started ------------------------";
pub const EXIT_BANNER: &str = "---------------------- Exited ------------------------";

/// Environment variable that overrides `--loglevel` with a full filter directive
pub const LOG_ENV_VAR: &str = "SERIAL_LOGGER_LOG";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders `LEVEL YYYY-MM-DD HH:MM:SS message`
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionLogFormat;

impl<S, N> FormatEvent<S, N> for SessionLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{} ", line_prefix(event.metadata().level(), &Local::now()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn line_prefix(level: &Level, now: &chrono::DateTime<Local>) -> String {
    format!("{} {}", level, now.format(TIMESTAMP_FORMAT))
}

/// Open `log_file` for appending
pub fn open_log_file(log_file: &Path) -> SerialLoggerResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| {
            SerialLoggerError::Logging(format!(
                "Failed to open log file {}: {}",
                log_file.display(),
                e
            ))
        })
}

/// Shared handle to the file the session log is written to.
///
/// Clones point at the same file, so the UI can redirect the log of a running
/// subscriber with `switch_to`.
#[derive(Debug, Clone)]
pub struct LogTarget {
    inner: Arc<Mutex<OpenLog>>,
}

#[derive(Debug)]
struct OpenLog {
    path: PathBuf,
    file: File,
}

impl LogTarget {
    pub fn open(log_file: &Path) -> SerialLoggerResult<Self> {
        let file = open_log_file(log_file)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(OpenLog {
                path: log_file.to_path_buf(),
                file,
            })),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.lock().path.clone()
    }

    /// Append further records to `log_file` instead. The current file is kept
    /// if the new one cannot be opened.
    pub fn switch_to(&self, log_file: &Path) -> SerialLoggerResult<()> {
        let file = open_log_file(log_file)?;
        let mut open = self.lock();
        open.path = log_file.to_path_buf();
        open.file = file;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, OpenLog> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Writer for one log record; holds the file lock while it lives
pub struct LogWriter<'a> {
    open: MutexGuard<'a, OpenLog>,
}

impl io::Write for LogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut self.open.file, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(&mut self.open.file)
    }
}

impl<'a> MakeWriter<'a> for LogTarget {
    type Writer = LogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter { open: self.lock() }
    }
}

/// Build the subscriber that writes the session log to `target`
pub fn build_subscriber(target: LogTarget, level: LevelFilter) -> impl Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .event_format(SessionLogFormat)
            .with_ansi(false)
            .with_writer(target),
    )
}

/// Initialize the process-wide logger writing to `log_file`
pub fn init_logging(log_file: &Path, level: LevelFilter) -> SerialLoggerResult<LogTarget> {
    let target = LogTarget::open(log_file)?;

    tracing::subscriber::set_global_default(build_subscriber(target.clone(), level))
        .map_err(|e| SerialLoggerError::Logging(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!("{}", START_BANNER);
    Ok(target)
}
