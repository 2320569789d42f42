//! Off-screen content frames.
//!
//! A [`Frame`] stands in for the hidden iframe of a browser context: it is
//! navigated once, polled for the current document, and closed exactly once
//! by the extractor on both the success and failure paths. Implementations
//! backed by an explicit render-complete signal may return the document on
//! the first poll after the signal; [`HttpFrame`] simply re-fetches the
//! route, which covers server-rendered documents.

use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use url::Url;

#[async_trait]
pub trait Frame: Send {
    /// Loads the target route into the frame.
    async fn navigate(&mut self, url: &Url) -> Result<()>;

    /// Returns the frame's current document as a full HTML string, or `None`
    /// while nothing has rendered yet.
    async fn poll_document(&mut self) -> Result<Option<String>>;

    /// Releases the frame's resources. Called exactly once by the extractor.
    async fn close(&mut self);
}

/// A frame that loads the print route over HTTP.
///
/// Sends no referrer information, and relies on the extractor's cache-busting
/// query parameter to defeat intermediary caches.
pub struct HttpFrame {
    client: reqwest::Client,
    url: Option<Url>,
    closed: bool,
}

impl HttpFrame {
    pub fn new() -> Result<Self> {
        let client = match reqwest::Client::builder().referer(false).build() {
            Ok(client) => client,
            Err(err) => exn::bail!(ErrorKind::Navigation(err.to_string())),
        };
        Ok(Self { client, url: None, closed: false })
    }
}

#[async_trait]
impl Frame for HttpFrame {
    async fn navigate(&mut self, url: &Url) -> Result<()> {
        self.url = Some(url.clone());
        Ok(())
    }

    async fn poll_document(&mut self) -> Result<Option<String>> {
        let Some(url) = &self.url else {
            exn::bail!(ErrorKind::Document("frame was never navigated".into()));
        };
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(err) => exn::bail!(ErrorKind::Navigation(err.to_string())),
        };
        if !response.status().is_success() {
            exn::bail!(ErrorKind::Navigation(format!("route returned {}", response.status())));
        }
        match response.text().await {
            Ok(body) => Ok(Some(body)),
            Err(err) => exn::bail!(ErrorKind::Document(err.to_string())),
        }
    }

    async fn close(&mut self) {
        self.closed = true;
        self.url = None;
        tracing::trace!("http frame closed");
    }
}
