use crate::domain::{
    config::FileConfig,
    error::{SerialLoggerError, SerialLoggerResult},
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory when `-c` is not given
pub const PROJECT_CONFIG_FILE: &str = ".serial_logger.toml";

/// Configuration manager
pub struct ConfigManager {
    project_config_path: PathBuf,
    global_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a manager using the default lookup locations
    pub fn new() -> Self {
        Self {
            project_config_path: PathBuf::from(PROJECT_CONFIG_FILE),
            global_config_path: Self::get_global_config_path(),
        }
    }

    /// Create a manager with explicit lookup locations
    pub fn with_paths(project_config_path: PathBuf, global_config_path: Option<PathBuf>) -> Self {
        Self {
            project_config_path,
            global_config_path,
        }
    }

    /// Load the config file.
    ///
    /// An explicit path must exist and parse. Without one, the project file
    /// and then the per-user file are tried; if neither exists every key is
    /// treated as absent.
    pub fn load_config(&self, explicit: Option<&Path>) -> SerialLoggerResult<FileConfig> {
        if let Some(path) = explicit {
            return self.load_config_from_path(path);
        }

        if self.project_config_path.exists() {
            return self.load_config_from_path(&self.project_config_path);
        }

        if let Some(global_path) = &self.global_config_path {
            if global_path.exists() {
                return self.load_config_from_path(global_path);
            }
        }

        debug!("No config file found, using built-in defaults");
        Ok(FileConfig::default())
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> SerialLoggerResult<FileConfig> {
        let content = fs::read_to_string(path).map_err(|e| SerialLoggerError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config = toml::from_str(&content).map_err(|e| SerialLoggerError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        debug!("Loaded config file {}", path.display());
        Ok(config)
    }

    /// Per-user configuration path
    fn get_global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("serial_logger").join("config.toml"))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
