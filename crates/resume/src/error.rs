//! Resume Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, following the same shape as the rest of the workspace.

use derive_more::{Display, Error};

/// A resume error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resume operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Template compilation or rendering failed.
    #[display("template error")]
    Template,
    /// An embedded asset is missing or not valid UTF-8.
    #[display("embedded asset not available: {_0}")]
    Asset(#[error(not(source))] String),
    /// Profile data could not be read or deserialized.
    #[display("invalid profile data: {_0}")]
    Profile(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed. Rendering is deterministic,
    /// so nothing here is.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
