//! Configuration module for evbook-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables. Also generates the token signing secret on
//! first start.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{AuthConfig, ServerConfig, SharedConfig};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Shortest accepted token secret, in bytes.
const MIN_SECRET_LEN: usize = 16;
/// Length of a generated token secret, in bytes.
const GENERATED_SECRET_LEN: usize = 32;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

impl LoadedConfig {
    /// Split into the fixed server section and the reloadable shared part.
    pub fn into_parts(self) -> (ServerConfig, SharedConfig) {
        (self.server, SharedConfig::new(self.auth))
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Generate a token secret if none is set (and rewrite the file)
    /// 4. Validate the configuration
    /// 5. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if !file_config.has_token_secret() {
            file_config.auth.token_secret = generate_secret();
            self.rewrite_config(&file_config)?;
            tracing::info!("Token secret generated and config file updated");
        }

        // Overrides are applied after the rewrite so they never end up on disk.
        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        self.validate(&file_config)?;
        self.build_loaded_config(file_config)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.server.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "server.request_timeout_secs must be positive".to_string(),
            ));
        }
        if config.auth.token_ttl_hours == 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_ttl_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }

    fn build_loaded_config(&self, file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        let secret = decode_secret(&file_config.auth.token_secret)?;

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
                request_timeout: Duration::from_secs(file_config.server.request_timeout_secs),
            },
            auth: AuthConfig::new(secret, i64::from(file_config.auth.token_ttl_hours) * 3600),
        })
    }
}

fn generate_secret() -> String {
    let bytes: [u8; GENERATED_SECRET_LEN] = rand::random();
    fast32::base64::RFC4648_NOPAD.encode(&bytes)
}

fn decode_secret(encoded: &str) -> Result<Box<[u8]>, ConfigError> {
    let secret = fast32::base64::RFC4648_NOPAD
        .decode_str(encoded.trim().trim_end_matches('='))
        .map_err(|_| ConfigError::ValidationError("auth.token_secret is not base64".to_string()))?;
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ValidationError(format!(
            "auth.token_secret must decode to at least {MIN_SECRET_LEN} bytes"
        )));
    }
    Ok(secret.into_boxed_slice())
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
