//! Engine errors

use accessor_types::ResolutionError;
use thiserror::Error;

/// Result type for engine dispatch
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors raised by property dispatch
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccessError {
    /// Read of a write-only or unknown property
    #[error("Cannot read property '{property}' of {class}")]
    NotReadable {
        /// Property name
        property: String,
        /// Class name
        class: String,
    },

    /// Write of a read-only or unknown property
    #[error("Cannot write property '{property}' of {class}")]
    NotWritable {
        /// Property name
        property: String,
        /// Class name
        class: String,
    },

    /// Accessor body reported an error
    #[error("{class}::{method} failed: {message}")]
    MethodFailed {
        /// Class name
        class: String,
        /// Method name
        method: String,
        /// Error message from the body
        message: String,
    },

    /// Class metadata could not be computed
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl AccessError {
    pub(crate) fn not_readable(property: &str, class: &str) -> Self {
        AccessError::NotReadable {
            property: property.to_string(),
            class: class.to_string(),
        }
    }

    pub(crate) fn not_writable(property: &str, class: &str) -> Self {
        AccessError::NotWritable {
            property: property.to_string(),
            class: class.to_string(),
        }
    }
}

/// Errors raised while exporting or importing object state
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Dispatch failed while restoring a property
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Class metadata could not be computed
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// JSON conversion failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Imported state was not a JSON object
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}
