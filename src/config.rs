use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Root directory for collection files, uploaded assets, and backups.
    pub data_dir: PathBuf,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
    /// Timestamped backup copies retained per collection
    pub max_backups: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            data_dir: PathBuf::from("./data"),
            max_upload_size: 20 * 1024 * 1024, // 20MB
            max_backups: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| defaults.bind_address.clone());

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| defaults.data_dir.clone());

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_upload_size);

        let max_backups = std::env::var("MAX_BACKUPS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_backups);

        let config = Config {
            bind_address,
            data_dir,
            max_upload_size,
            max_backups,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        if self.max_backups == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_BACKUPS must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn terms_file(&self) -> PathBuf {
        self.data_dir.join("glossary_user.json")
    }

    pub fn images_file(&self) -> PathBuf {
        self.data_dir.join("images.json")
    }

    pub fn equations_file(&self) -> PathBuf {
        self.data_dir.join("equations.json")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }
}
