//! Gateway client configuration
//!
//! TOML file plus environment overrides. Environment variables follow the
//! pattern `SALTGATE_<SECTION>_<KEY>`, for example
//! `SALTGATE_LOG_LEVEL=debug`.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod error;

pub use error::ConfigError;

/// Practical size cap for text bodies, enforced before sealing.
const DEFAULT_MAX_TEXT_BYTES: usize = 3500;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    pub account: AccountConfig,
    pub logging: LoggingConfig,
    pub limits: LimitsConfig,
}

/// The gateway account this process sends as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// 8-character account identity, `*` prefix for gateway accounts.
    pub identity: String,

    /// Path to the long-term private key, stored in `private:<hex>` text
    /// form.
    pub private_key_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Emit newline-delimited JSON.
    pub json_format: bool,

    /// Include the emitting module path.
    pub with_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Reject text messages longer than this many UTF-8 bytes.
    pub max_text_bytes: usize,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            identity: String::new(),
            private_key_file: PathBuf::from("private_key.txt"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_target: true,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
        }
    }
}

impl GatewayConfig {
    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Start from defaults and apply `SALTGATE_*` environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SALTGATE_*` environment overrides on top of this config.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(identity) = env::var("SALTGATE_ACCOUNT_IDENTITY") {
            self.account.identity = identity;
        }
        if let Ok(path) = env::var("SALTGATE_ACCOUNT_PRIVATE_KEY_FILE") {
            self.account.private_key_file = PathBuf::from(path);
        }
        if let Ok(level) = env::var("SALTGATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = env::var("SALTGATE_LOG_JSON") {
            self.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("invalid JSON flag: {}", e)))?;
        }
        if let Ok(max) = env::var("SALTGATE_LIMITS_MAX_TEXT_BYTES") {
            self.limits.max_text_bytes = max
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("invalid text limit: {}", e)))?;
        }
        Ok(())
    }

    /// Write the configuration back out as TOML.
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.account.identity.is_empty() && self.account.identity.len() != 8 {
            return Err(ConfigError::ValidationFailed(format!(
                "account identity must be 8 characters, got {}",
                self.account.identity.len()
            )));
        }
        if self.limits.max_text_bytes == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_text_bytes must be positive".to_string(),
            ));
        }
        self.logging
            .level
            .parse::<crate::logging::LogLevel>()
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;
        Ok(())
    }
}
