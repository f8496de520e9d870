//! Logging subsystem errors

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LoggingError {
    #[error("failed to initialize logging: {0}")]
    InitializationFailed(String),

    #[error("invalid logging configuration: {0}")]
    InvalidConfiguration(String),
}
