use std::{fs, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "keyshake";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_MESSAGE: &str = "Hi, I am Alice.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default log level (error, warn, info, debug, trace); RUST_LOG still wins
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Message Alice sends in the demo
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            message: default_message(),
        }
    }
}

impl AppConfig {
    /// Parse the configured log level
    pub fn log_level(&self) -> Result<tracing::Level, StateError> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| StateError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the keyshake directory (~/.keyshake)
    pub config_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the config directory path (custom or default ~/.keyshake)
    pub fn config_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Write a new config file
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let config_dir = Self::config_dir(custom_path)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        // Reject a bad level now rather than on every later run
        config.log_level()?;

        fs::create_dir_all(&config_dir)?;
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            config_dir,
            config_path,
            config,
        })
    }

    /// Load an existing config file
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let config_dir = Self::config_dir(custom_path)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            config_dir,
            config_path,
            config,
        })
    }

    /// Load the config file, falling back to defaults when none exists
    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        match Self::load(custom_path.clone()) {
            Err(StateError::NotInitialized) => {
                let config_dir = Self::config_dir(custom_path)?;
                Ok(Self {
                    config_path: config_dir.join(CONFIG_FILE_NAME),
                    config_dir,
                    config: AppConfig::default(),
                })
            }
            other => other,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("keyshake config not initialized. Run 'keyshake init' first")]
    NotInitialized,

    #[error("keyshake config already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
