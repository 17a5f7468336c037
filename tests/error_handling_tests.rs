use serial_logger::domain::error::ValidationWarning;
use serial_logger::{SerialLoggerError, SerialLoggerResult};
use std::error::Error;

/// Error handling and resilience tests
#[cfg(test)]
mod error_handling_tests {
    use super::*;

    fn connection_error() -> SerialLoggerError {
        SerialLoggerError::Connection {
            port: "/dev/ttyUSB0".to_string(),
            source: serialport::Error::new(serialport::ErrorKind::NoDevice, "device unplugged"),
        }
    }

    #[test]
    fn test_error_types() {
        let errors = vec![
            SerialLoggerError::MissingArgument("device".to_string()),
            SerialLoggerError::Config { message: "Config error".to_string() },
            connection_error(),
            SerialLoggerError::DeviceNotConnected,
            SerialLoggerError::Logging("Logging error".to_string()),
            SerialLoggerError::Tui("TUI error".to_string()),
            SerialLoggerError::Output("Output error".to_string()),
        ];

        for error in errors {
            let display = error.to_string();
            assert!(!display.is_empty(), "Error display should not be empty");
        }

        // Errors cross the worker thread and the blocking task boundary
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SerialLoggerError>();
    }

    #[test]
    fn test_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: SerialLoggerError = io_error.into();
        assert!(matches!(error, SerialLoggerError::Io(_)));
    }

    #[test]
    fn test_missing_argument_names_field() {
        let error = SerialLoggerError::MissingArgument("baud".to_string());
        assert_eq!(error.to_string(), "Missing required argument 'baud'");
        assert_eq!(error.missing_field(), Some("baud"));
        assert_eq!(SerialLoggerError::DeviceNotConnected.missing_field(), None);
    }

    #[test]
    fn test_result_type() {
        fn success_function() -> SerialLoggerResult<String> {
            Ok("success".to_string())
        }

        fn error_function() -> SerialLoggerResult<String> {
            Err(SerialLoggerError::Config {
                message: "Test error".to_string(),
            })
        }

        assert_eq!(success_function().unwrap(), "success");
        assert!(error_function().unwrap_err().to_string().contains("Configuration"));
    }

    #[test]
    fn test_error_chain() {
        let error = connection_error();

        let mut current_error: &dyn Error = &error;
        let mut depth = 0;
        while let Some(source) = current_error.source() {
            current_error = source;
            depth += 1;
            if depth > 10 {
                break;
            }
        }

        assert_eq!(depth, 1);
        assert!(current_error.to_string().contains("device unplugged"));
    }

    #[test]
    fn test_error_formatting() {
        let error = connection_error();

        let display = format!("{}", error);
        let debug = format!("{:?}", error);

        assert!(display.contains("/dev/ttyUSB0"));
        assert!(display.contains("device unplugged"));
        assert_ne!(display, debug);
    }

    #[test]
    fn test_validation_warnings_are_user_text() {
        assert_eq!(
            ValidationWarning::InvalidBaud("fast".to_string()).to_string(),
            "Invalid baud rate 'fast'"
        );
        assert_eq!(
            ValidationWarning::NoSuchDevice("/dev/ttyX".to_string()).to_string(),
            "No such device '/dev/ttyX'"
        );
    }

    #[tokio::test]
    async fn test_error_crosses_blocking_task() {
        let result = tokio::task::spawn_blocking(|| -> SerialLoggerResult<()> {
            Err(SerialLoggerError::DeviceNotConnected)
        })
        .await
        .expect("task panicked");

        assert!(matches!(result, Err(SerialLoggerError::DeviceNotConnected)));
    }

    #[test]
    fn test_error_size() {
        let error_size = std::mem::size_of::<SerialLoggerError>();
        assert!(error_size <= 128, "SerialLoggerError too large: {} bytes", error_size);
    }
}
