//! Core error types

use thiserror::Error;

/// Errors raised while sampling element geometry or host state.
///
/// None of these are fatal: callers log them and drop the sample.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CadenceError {
    /// The element is not (or no longer) attached to the document
    #[error("element is detached from the document")]
    Detached,

    /// Geometry could not be read or is unusable
    #[error("geometry unavailable: {0}")]
    Geometry(String),

    /// An element id does not refer to a live element
    #[error("unknown element: {0}")]
    UnknownElement(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for cadence_core operations
pub type Result<T> = std::result::Result<T, CadenceError>;
