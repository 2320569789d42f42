//! Service Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, following the same shape as the rest of the workspace.
//! These cover service startup only; per-request failures are expressed as
//! HTTP responses by the handlers.

use derive_more::{Display, Error};

/// A service error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The listen address could not be bound.
    #[display("failed to bind {_0}")]
    Bind(#[error(not(source))] String),
    /// The configured CORS origin is not a valid header value.
    #[display("invalid CORS origin: {_0}")]
    Cors(#[error(not(source))] String),
    /// The profile file could not be loaded.
    #[display("profile could not be loaded")]
    Profile,
    /// The HTML renderer could not be constructed.
    #[display("renderer could not be constructed")]
    Renderer,
    /// The accept loop failed.
    #[display("server terminated: {_0}")]
    Serve(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Bind(_) | Self::Serve(_))
    }
}
