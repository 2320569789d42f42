//! Snapshot Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, following the same shape as the rest of the workspace.

use derive_more::{Display, Error};

/// A snapshot error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resume document never became ready within the deadline.
    #[display("timed out waiting for resume document")]
    Timeout,
    /// The frame could not load the target route at all.
    #[display("failed to load resume route: {_0}")]
    Navigation(#[error(not(source))] String),
    /// The frame loaded but the document could not be read back.
    #[display("failed to read frame document: {_0}")]
    Document(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Navigation(_))
    }
}
