//! Error types for cadence_app

use cadence_core::CadenceError;
use cadence_platform::PlatformError;
use thiserror::Error;

/// Errors that can occur while configuring or driving a page
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration text could not be parsed
    #[error("config parse failed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is out of range
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Configuration file could not be read
    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),

    /// Host platform error (clipboard, environment)
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Element or geometry error
    #[error(transparent)]
    Core(#[from] CadenceError),
}

/// Result type for cadence_app operations
pub type Result<T> = std::result::Result<T, AppError>;
