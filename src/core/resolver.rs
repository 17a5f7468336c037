use crate::core::prompt::Console;
use crate::domain::{
    config::{
        CliOverrides, ConnectionConfig, FileConfig, Settings, DEFAULT_BAUD_RATE,
        DEFAULT_LOG_FILE, DEFAULT_TIMEOUT_SECS,
    },
    error::{SerialLoggerError, SerialLoggerResult, ValidationWarning},
};
use crate::infrastructure::serial::{PortEnumerator, PortInfo};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const GREETING: &str = "\nWelcome to the serial_logger tool.";

/// Outcome of connection resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Ready(ConnectionConfig),
    /// Nothing to connect to, or the user ended input at a prompt
    Aborted,
}

/// Merge command line values, config file values and built-in defaults.
///
/// Each field independently takes the first of: CLI, config file, default.
pub fn merge_settings(cli: &CliOverrides, file: &FileConfig) -> Settings {
    let defaults = &file.defaults;

    let device = cli
        .device
        .clone()
        .or_else(|| defaults.device.clone())
        .filter(|device| !device.trim().is_empty());

    let baud = cli
        .baud
        .map(|baud| baud.to_string())
        .or_else(|| defaults.baud.as_ref().map(|value| value.as_raw()))
        .or_else(|| Some(DEFAULT_BAUD_RATE.to_string()));

    let timeout = match cli.timeout {
        Some(seconds) => parse_timeout(&seconds.to_string()),
        None => defaults
            .timeout
            .as_ref()
            .map(|value| parse_timeout(&value.as_raw()))
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
    };

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| defaults.logfile.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    Settings {
        device,
        baud,
        timeout,
        log_file,
    }
}

/// Parse a timeout in whole seconds.
///
/// Unlike baud and device, a bad timeout is never reported: it silently
/// becomes the default.
pub fn parse_timeout(raw: &str) -> Duration {
    match raw.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Duration::from_secs(seconds),
        _ => {
            debug!("Ignoring timeout '{}', using {}s", raw, DEFAULT_TIMEOUT_SECS);
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        }
    }
}

/// Parse a baud rate; only positive integers are accepted
pub fn parse_baud(raw: &str) -> Result<u32, ValidationWarning> {
    match raw.trim().parse::<u32>() {
        Ok(baud) if baud > 0 => Ok(baud),
        _ => Err(ValidationWarning::InvalidBaud(raw.to_string())),
    }
}

/// Check that a device path exists where that can be checked.
///
/// Windows port names (`COM3`) are not filesystem paths, so they pass as-is.
pub fn check_device(path: &str) -> Result<String, ValidationWarning> {
    if cfg!(windows) || Path::new(path).exists() {
        Ok(path.to_string())
    } else {
        Err(ValidationWarning::NoSuchDevice(path.to_string()))
    }
}

/// Turns merged settings into a validated connection, prompting when allowed
pub struct ConnectionResolver<'a> {
    console: &'a mut dyn Console,
    ports: &'a dyn PortEnumerator,
}

impl<'a> ConnectionResolver<'a> {
    pub fn new(console: &'a mut dyn Console, ports: &'a dyn PortEnumerator) -> Self {
        Self { console, ports }
    }

    pub fn resolve(&mut self, settings: &Settings, interactive: bool) -> SerialLoggerResult<Resolution> {
        if interactive {
            self.resolve_interactive(settings)
        } else {
            self.resolve_batch(settings).map(Resolution::Ready)
        }
    }

    fn resolve_batch(&mut self, settings: &Settings) -> SerialLoggerResult<ConnectionConfig> {
        let port = settings
            .device
            .as_deref()
            .and_then(|device| self.validate(check_device(device)))
            .ok_or_else(|| SerialLoggerError::MissingArgument("device".to_string()))?;
        let baud_rate = settings
            .baud
            .as_deref()
            .and_then(|baud| self.validate(parse_baud(baud)))
            .ok_or_else(|| SerialLoggerError::MissingArgument("baud".to_string()))?;

        Ok(ConnectionConfig::new(port, baud_rate)
            .with_timeout(settings.timeout)
            .with_interactive(false))
    }

    fn resolve_interactive(&mut self, settings: &Settings) -> SerialLoggerResult<Resolution> {
        self.console.say(GREETING);

        let mut port = settings
            .device
            .as_deref()
            .and_then(|device| self.validate(check_device(device)));

        if port.is_none() {
            let available = self.list_ports();
            if available.is_empty() {
                self.console.say("There are no available serial ports.");
                debug!("No available ports to connect to");
                return Ok(Resolution::Aborted);
            }

            self.console.say("Available serial ports:");
            for info in &available {
                self.console.say(&format!("\t{}", info.name));
            }
            self.console.say("");

            while port.is_none() {
                let Some(answer) = self.console.ask("Choose a port: ")? else {
                    return Ok(Resolution::Aborted);
                };
                if !answer.is_empty() {
                    port = self.validate(check_device(&answer));
                }
            }
        }

        let mut baud_rate = settings
            .baud
            .as_deref()
            .and_then(|baud| self.validate(parse_baud(baud)));

        while baud_rate.is_none() {
            let Some(answer) = self.console.ask("Choose a baud rate: ")? else {
                return Ok(Resolution::Aborted);
            };
            if !answer.is_empty() {
                baud_rate = self.validate(parse_baud(&answer));
            }
        }

        match (port, baud_rate) {
            (Some(port), Some(baud_rate)) => Ok(Resolution::Ready(
                ConnectionConfig::new(port, baud_rate).with_timeout(settings.timeout),
            )),
            _ => Ok(Resolution::Aborted),
        }
    }

    fn list_ports(&mut self) -> Vec<PortInfo> {
        match self.ports.available_ports() {
            Ok(ports) => ports,
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        }
    }

    /// Report a rejected value and clear it
    fn validate<T>(&mut self, result: Result<T, ValidationWarning>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(warning) => {
                warn!("{}", warning);
                self.console.say(&warning.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::ScriptedConsole;
    use crate::domain::config::{ConfigValue, DefaultSection};
    use tempfile::NamedTempFile;

    struct FixedPorts(Vec<PortInfo>);

    impl PortEnumerator for FixedPorts {
        fn available_ports(&self) -> SerialLoggerResult<Vec<PortInfo>> {
            Ok(self.0.clone())
        }
    }

    fn file_config(baud: Option<ConfigValue>, device: Option<&str>, timeout: Option<ConfigValue>) -> FileConfig {
        FileConfig {
            defaults: DefaultSection {
                logfile: Some(PathBuf::from("from_config.log")),
                baud,
                device: device.map(str::to_string),
                timeout,
            },
        }
    }

    fn settings(device: Option<&str>, baud: Option<&str>) -> Settings {
        Settings {
            device: device.map(str::to_string),
            baud: baud.map(str::to_string),
            ..Settings::default()
        }
    }

    #[test]
    fn test_cli_beats_config_beats_default() {
        let file = file_config(Some(ConfigValue::Integer(19200)), Some("/dev/ttyCFG"), Some(ConfigValue::Integer(9)));
        let cli = CliOverrides {
            baud: Some(57600),
            ..CliOverrides::default()
        };

        let merged = merge_settings(&cli, &file);
        assert_eq!(merged.baud.as_deref(), Some("57600"));
        assert_eq!(merged.device.as_deref(), Some("/dev/ttyCFG"));
        assert_eq!(merged.timeout, Duration::from_secs(9));
        assert_eq!(merged.log_file, PathBuf::from("from_config.log"));

        let merged = merge_settings(&CliOverrides::default(), &FileConfig::default());
        assert_eq!(merged, Settings::default());
    }

    #[test]
    fn test_cli_log_file_overrides_config() {
        let cli = CliOverrides {
            log_file: Some(PathBuf::from("cli.log")),
            timeout: Some(2),
            ..CliOverrides::default()
        };
        let merged = merge_settings(&cli, &file_config(None, None, Some(ConfigValue::Integer(9))));
        assert_eq!(merged.log_file, PathBuf::from("cli.log"));
        assert_eq!(merged.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_bad_timeout_silently_defaults() {
        for raw in ["soon", "", "-3", "0", "2.5"] {
            assert_eq!(parse_timeout(raw), Duration::from_secs(5), "timeout {:?}", raw);
        }
        let merged = merge_settings(
            &CliOverrides::default(),
            &file_config(None, None, Some(ConfigValue::Text("later".to_string()))),
        );
        assert_eq!(merged.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_parse_baud_rejects_non_positive_and_non_numeric() {
        assert_eq!(parse_baud("115200"), Ok(115200));
        assert_eq!(parse_baud(" 300 "), Ok(300));
        for raw in ["fast", "", "0", "-9600", "96.00"] {
            assert!(parse_baud(raw).is_err(), "baud {:?}", raw);
        }
    }

    #[test]
    fn test_batch_requires_device() {
        let mut console = ScriptedConsole::default();
        let ports = FixedPorts(vec![PortInfo::new("/dev/ttyUSB0", "USB")]);
        let mut resolver = ConnectionResolver::new(&mut console, &ports);

        let error = resolver.resolve(&settings(None, Some("9600")), false).unwrap_err();
        assert_eq!(error.missing_field(), Some("device"));
        assert!(console.transcript.is_empty());
    }

    #[test]
    fn test_batch_requires_baud() {
        let device = NamedTempFile::new().unwrap();
        let path = device.path().to_string_lossy().to_string();
        let mut console = ScriptedConsole::default();
        let ports = FixedPorts(Vec::new());
        let mut resolver = ConnectionResolver::new(&mut console, &ports);

        let error = resolver.resolve(&settings(Some(&path), None), false).unwrap_err();
        assert_eq!(error.missing_field(), Some("baud"));
    }

    #[test]
    fn test_batch_rejects_invalid_values() {
        let device = NamedTempFile::new().unwrap();
        let path = device.path().to_string_lossy().to_string();
        let ports = FixedPorts(Vec::new());

        let mut console = ScriptedConsole::default();
        let error = ConnectionResolver::new(&mut console, &ports)
            .resolve(&settings(Some(&path), Some("fast")), false)
            .unwrap_err();
        assert_eq!(error.missing_field(), Some("baud"));
        assert!(console.printed("Invalid baud rate 'fast'"));

        let mut console = ScriptedConsole::default();
        let error = ConnectionResolver::new(&mut console, &ports)
            .resolve(&settings(Some("/dev/serial-logger-absent"), Some("9600")), false)
            .unwrap_err();
        assert_eq!(error.missing_field(), Some("device"));
        assert!(console.printed("No such device '/dev/serial-logger-absent'"));
    }

    #[test]
    fn test_batch_ready() {
        let device = NamedTempFile::new().unwrap();
        let path = device.path().to_string_lossy().to_string();
        let mut console = ScriptedConsole::default();
        let ports = FixedPorts(Vec::new());

        let resolution = ConnectionResolver::new(&mut console, &ports)
            .resolve(&settings(Some(&path), Some("38400")), false)
            .unwrap();

        assert_eq!(
            resolution,
            Resolution::Ready(ConnectionConfig {
                port: path,
                baud_rate: 38400,
                timeout: Duration::from_secs(5),
                interactive: false,
            })
        );
    }

    #[test]
    fn test_interactive_empty_enumeration_aborts() {
        let mut console = ScriptedConsole::new(["/dev/ttyUSB0"]);
        let ports = FixedPorts(Vec::new());

        let resolution = ConnectionResolver::new(&mut console, &ports)
            .resolve(&settings(None, Some("9600")), true)
            .unwrap();

        assert_eq!(resolution, Resolution::Aborted);
        assert!(console.printed("There are no available serial ports."));
        assert!(!console.printed("Choose a port"));
    }

    #[test]
    fn test_interactive_reprompts_until_valid() {
        let device = NamedTempFile::new().unwrap();
        let path = device.path().to_string_lossy().to_string();
        let mut console = ScriptedConsole::new([
            "/dev/serial-logger-absent".to_string(),
            String::new(),
            path.clone(),
            "fast".to_string(),
            "0".to_string(),
            "115200".to_string(),
        ]);
        let ports = FixedPorts(vec![PortInfo::new(path.clone(), "USB")]);

        let resolution = ConnectionResolver::new(&mut console, &ports)
            .resolve(&settings(None, Some("not-a-number")), true)
            .unwrap();

        match resolution {
            Resolution::Ready(config) => {
                assert_eq!(config.port, path);
                assert_eq!(config.baud_rate, 115200);
                assert!(config.interactive);
            }
            Resolution::Aborted => panic!("resolution should succeed"),
        }
        assert!(console.printed("Available serial ports:"));
        assert!(console.printed("No such device '/dev/serial-logger-absent'"));
        assert!(console.printed("Invalid baud rate 'not-a-number'"));
        assert!(console.printed("Invalid baud rate 'fast'"));
        assert!(console.printed("Invalid baud rate '0'"));
    }

    #[test]
    fn test_interactive_missing_configured_device_falls_back_to_prompt() {
        let device = NamedTempFile::new().unwrap();
        let path = device.path().to_string_lossy().to_string();
        let mut console = ScriptedConsole::new([path.clone()]);
        let ports = FixedPorts(vec![PortInfo::new(path.clone(), "USB")]);

        let resolution = ConnectionResolver::new(&mut console, &ports)
            .resolve(&settings(Some("/dev/serial-logger-gone"), Some("9600")), true)
            .unwrap();

        assert!(matches!(resolution, Resolution::Ready(ref config) if config.port == path));
        assert!(console.printed("No such device '/dev/serial-logger-gone'"));
    }

    #[test]
    fn test_interactive_end_of_input_aborts() {
        let mut console = ScriptedConsole::default();
        let ports = FixedPorts(vec![PortInfo::new("/dev/ttyUSB0", "USB")]);

        let resolution = ConnectionResolver::new(&mut console, &ports)
            .resolve(&settings(None, Some("9600")), true)
            .unwrap();

        assert_eq!(resolution, Resolution::Aborted);
    }

    #[test]
    fn test_interactive_valid_settings_need_no_prompt() {
        let device = NamedTempFile::new().unwrap();
        let path = device.path().to_string_lossy().to_string();
        let mut console = ScriptedConsole::default();
        let ports = FixedPorts(Vec::new());

        let resolution = ConnectionResolver::new(&mut console, &ports)
            .resolve(&settings(Some(&path), Some("9600")), true)
            .unwrap();

        assert!(matches!(resolution, Resolution::Ready(_)));
        assert!(!console.printed("Choose"));
    }
}
