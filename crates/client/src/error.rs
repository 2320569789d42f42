//! Client Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, following the same shape as the rest of the workspace.

use derive_more::{Display, Error};

/// A delivery error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for delivery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// The diagnosable service failure modes are kept distinct: a non-2xx
/// status, a 2xx with the wrong content type, and a 2xx PDF with an empty
/// body each point at a different misconfiguration.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client configuration is missing or invalid.
    #[display("delivery client is not configured")]
    Config,
    /// Snapshot extraction from the source document failed.
    #[display("snapshot extraction failed")]
    Snapshot,
    /// The conversion service answered with a non-success status.
    #[display("conversion service returned status {_0}")]
    ServiceStatus(#[error(not(source))] u16),
    /// The conversion service answered 2xx but not with a PDF.
    #[display("conversion service returned a non-PDF response")]
    NotPdf,
    /// The conversion service answered with a PDF content type but no bytes.
    #[display("conversion service returned an empty document")]
    EmptyBody,
    /// The conversion service could not be reached.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The PDF could not be written to disk.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Io => true,
            Self::ServiceStatus(status) => *status >= 500,
            _ => false,
        }
    }
}
