//! Portable HTML snapshots of the rendered resume.
//!
//! The extractor pulls a materialized copy of the resume document out of an
//! off-screen [`Frame`] pointed at the print-only route, then turns it into a
//! self-contained HTML string: scripts are stripped so the snapshot cannot
//! execute code wherever it is rendered next, and a `<base>` tag is injected
//! so relative asset references resolve outside the original page context.

pub mod error;
mod extract;
mod frame;

pub use crate::extract::Extractor;
pub use crate::frame::{Frame, HttpFrame};
