//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// A host signal could not be read
    #[error("Host signal unavailable: {0}")]
    Unavailable(String),

    /// The host does not support this capability
    #[error("Not supported by this host: {0}")]
    Unsupported(String),

    /// Writing to the clipboard failed
    #[error("Clipboard write failed: {0}")]
    Clipboard(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
