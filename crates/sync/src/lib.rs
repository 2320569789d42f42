//! Live sync between the resume editor and its preview.
//!
//! The editor and the preview render the same [`ResumeParams`] but never
//! share state: updates cross the boundary as typed [`Envelope`]s over a
//! message [`channel`], and every receiver copies the payload on receipt.
//! A receiver only accepts envelopes whose sender [`Origin`] matches its own;
//! anything else is discarded without surfacing an error, mirroring the
//! same-origin policy of cross-document messaging.
//!
//! This crate is a library for embedding: an interactive editor frontend
//! constructs the [`channel`] and drives a [`ResumeContext`] per preview
//! pane. The `folio` binary itself has no interactive surface and does not
//! link it.

mod channel;
mod context;

pub use crate::channel::{Port, channel};
pub use crate::context::{AddressBar, ResumeContext};

use folio_params::ResumeParams;
use serde::{Deserialize, Serialize};
use url::Url;

/// A normalized `scheme://host[:port]` identity for a messaging endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin(String);

impl Origin {
    /// Normalizes to lowercase with no trailing slash, so two spellings of
    /// the same origin compare equal.
    pub fn new(origin: impl AsRef<str>) -> Self {
        Self(origin.as_ref().trim_end_matches('/').to_ascii_lowercase())
    }

    pub fn from_url(url: &Url) -> Self {
        Self::new(url.origin().ascii_serialization())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The typed message vocabulary of the channel.
///
/// Serialized with the envelope shape of the wire protocol:
/// `{ "type": "Resume/UpdateParams", "payload": { … } }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Message {
    /// Replace the receiver's params wholesale (never merged).
    #[serde(rename = "Resume/UpdateParams")]
    UpdateParams(ResumeParams),
}

/// A message stamped with its sender's origin at post time.
///
/// The origin is attached by the channel, not the sender, so a sender cannot
/// forge it.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub origin: Origin,
    pub message: Message,
}
