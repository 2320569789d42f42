//! Render Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, following the same shape as the rest of the workspace.

use derive_more::{Display, Error};

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable browser executable on this machine.
    #[display("no chrome/chromium executable detected")]
    BrowserNotFound,
    /// The browser executable exists but refused to start.
    #[display("browser launch failed: {_0}")]
    Launch(#[error(not(source))] String),
    /// Navigation or content loading failed inside the browser.
    #[display("page load failed: {_0}")]
    PageLoad(#[error(not(source))] String),
    /// The print-to-PDF export itself failed or produced nothing.
    #[display("pdf export failed: {_0}")]
    Export(#[error(not(source))] String),
    /// Filesystem error while persisting HTML for the browser.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Launch(_) | Self::Io)
    }
}
