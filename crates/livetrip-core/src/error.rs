//! Error types for option vocabulary operations.

use thiserror::Error;

use crate::api::ApiError;

/// Result type for option store operations
pub type Result<T> = std::result::Result<T, OptionsError>;

/// A mutation rejected before anything was applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Label is required")]
    MissingLabel,

    #[error("Option already exists: {0}")]
    DuplicateLabel(String),

    #[error("Option cannot be deleted: {0}")]
    ProtectedEntry(String),

    #[error("No such option: {0}")]
    UnknownLabel(String),

    #[error("No option at position {0}")]
    UnknownIndex(usize),
}

/// Failure of a store operation that the caller has to act on.
///
/// Local cache problems never appear here: reads fall back to the next
/// source and writes are already committed remotely when the cache is
/// touched.
#[derive(Error, Debug)]
pub enum OptionsError {
    /// The remote service could not be reached or refused the request.
    #[error("Remote error: {0}")]
    Transport(#[from] ApiError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl OptionsError {
    /// Label the caller should highlight, if the error is about one.
    pub fn offending_label(&self) -> Option<&str> {
        match self {
            OptionsError::Validation(
                ValidationError::DuplicateLabel(label)
                | ValidationError::ProtectedEntry(label)
                | ValidationError::UnknownLabel(label),
            ) => Some(label),
            _ => None,
        }
    }
}
