//! PDF delivery client.
//!
//! Combines the snapshot extractor and the conversion service into the
//! user-facing "download my resume as a PDF" flow: snapshot, convert, save,
//! optionally open. See [`PdfClient::download_resume_as_pdf`].

mod deliver;
pub mod error;
mod progress;

pub use deliver::{DeliveryOptions, PdfClient};
pub use progress::PdfProgress;
