//! User-facing delivery progress.

use derive_more::Display;

/// Coarse milestones of a PDF delivery, in the order they are emitted. The
/// display strings are the exact labels shown to the user.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum PdfProgress {
    #[display("Generate HTML")]
    Prepare,
    #[display("Converting HTML to PDF")]
    Converting,
    #[display("Saving")]
    Saving,
    #[display("Done")]
    Done,
    #[display("Error")]
    Error,
}
