//! Receiving contexts: the preview frame and the top-level editor page.

use crate::{Envelope, Message, Origin};
use folio_params::{ResumeParams, codec};

/// The visible address of the hosting page.
///
/// Replacement is silent: no navigation happens, the path and query are just
/// rewritten so the address stays consistent with in-memory state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressBar {
    path: String,
    query: String,
}

impl AddressBar {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self { path: path.into(), query: query.into() }
    }

    pub fn replace(&mut self, path: impl Into<String>, query: impl Into<String>) {
        self.path = path.into();
        self.query = query.into();
    }

    /// The visible path-plus-query, with no `?` when the query is empty.
    pub fn location(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// A context that renders the resume from a local copy of [`ResumeParams`].
///
/// Holds its own independent copy of the params; updates only arrive via
/// [`handle`](Self::handle). A context constructed with an address bar is the
/// top-level editor and mirrors accepted updates into the visible URL.
pub struct ResumeContext {
    origin: Origin,
    params: ResumeParams,
    address_bar: Option<AddressBar>,
}

impl ResumeContext {
    pub fn new(origin: Origin, params: ResumeParams) -> Self {
        Self { origin, params, address_bar: None }
    }

    /// A top-level context whose address bar follows accepted updates.
    pub fn with_address_bar(origin: Origin, params: ResumeParams, address_bar: AddressBar) -> Self {
        Self { origin, params, address_bar: Some(address_bar) }
    }

    pub fn params(&self) -> &ResumeParams {
        &self.params
    }

    pub fn address_bar(&self) -> Option<&AddressBar> {
        self.address_bar.as_ref()
    }

    /// Handles one envelope; returns `true` when a re-render is needed.
    ///
    /// Envelopes from any other origin are discarded unmodified, with no
    /// error surfaced. An accepted update replaces the local params wholesale
    /// and, in the top-level context, rewrites the address bar with the
    /// re-serialized query string.
    pub fn handle(&mut self, envelope: Envelope) -> bool {
        if envelope.origin != self.origin {
            tracing::trace!(
                origin = envelope.origin.as_str(),
                own = self.origin.as_str(),
                "discarding message from foreign origin"
            );
            return false;
        }
        match envelope.message {
            Message::UpdateParams(params) => {
                self.params = params;
                if let Some(bar) = &mut self.address_bar {
                    let path = bar.location();
                    let path = path.split('?').next().unwrap_or_default().to_string();
                    bar.replace(path, codec::serialize(&self.params));
                }
                true
            }
        }
    }
}
