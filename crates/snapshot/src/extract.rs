//! The snapshot extraction algorithm.

use crate::error::{ErrorKind, Result};
use crate::frame::Frame;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::instrument;
use url::Url;

/// Query parameter used solely to defeat caching; ignored by application logic.
const PARAM_CACHE_BUSTER: &str = "ts";

/// Paired (possibly multiline) and self-closing script tags, case-insensitive.
static SCRIPT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*/>|<script\b.*?</script\s*>").unwrap());

/// The opening head tag, so the base tag lands as its first child.
static HEAD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<head(.*?)>").unwrap());

/// Waits for a resume document to materialize inside a [`Frame`] and
/// serializes it into a portable HTML string.
///
/// "Ready" means the marker element exists *and* carries non-trivial rendered
/// content; existence alone is not enough, because the frame may render
/// asynchronously after its load event.
pub struct Extractor {
    marker_id: String,
    min_content_len: usize,
    poll_interval: Duration,
    timeout: Duration,
    public_base: Option<Url>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            marker_id: "resume-content".to_string(),
            min_content_len: 100,
            poll_interval: Duration::from_millis(50),
            timeout: Duration::from_secs(8),
            public_base: None,
        }
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the `<base>` href. Without this the snapshot resolves
    /// relative references against the print route's own origin.
    pub fn with_public_base(mut self, base: impl Into<Option<Url>>) -> Self {
        self.public_base = base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Navigates the frame to `target` (with a cache-busting `ts` parameter
    /// appended) and resolves with the finalized snapshot string.
    ///
    /// The frame is closed exactly once, on success, failure, and timeout
    /// alike, so a frame never outlives its triggering extraction.
    #[instrument(skip_all, fields(url = %target))]
    pub async fn extract<F: Frame + ?Sized>(&self, frame: &mut F, target: &Url) -> Result<String> {
        let mut url = target.clone();
        url.query_pairs_mut().append_pair(PARAM_CACHE_BUSTER, &cache_buster());
        let outcome = tokio::time::timeout(self.timeout, self.run(frame, &url)).await;
        frame.close().await;
        match outcome {
            Ok(Ok(snapshot)) => {
                tracing::debug!(bytes = snapshot.len(), "snapshot extracted");
                Ok(snapshot)
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "snapshot extraction failed");
                Err(err)
            }
            Err(_elapsed) => {
                tracing::warn!(timeout = ?self.timeout, "resume document never became ready");
                exn::bail!(ErrorKind::Timeout)
            }
        }
    }

    async fn run<F: Frame + ?Sized>(&self, frame: &mut F, url: &Url) -> Result<String> {
        frame.navigate(url).await?;
        let mut interval = tokio::time::interval(self.poll_interval);
        loop {
            interval.tick().await;
            let Some(document) = frame.poll_document().await? else { continue };
            if self.marker_ready(&document) {
                return Ok(self.finalize(&document, url));
            }
        }
    }

    /// The marker element exists and its trimmed inner HTML exceeds the
    /// minimum content length.
    fn marker_ready(&self, document: &str) -> bool {
        let Ok(selector) = Selector::parse(&format!("#{}", self.marker_id)) else {
            return false;
        };
        let html = Html::parse_document(document);
        html.select(&selector)
            .next()
            .is_some_and(|element| element.inner_html().trim().len() > self.min_content_len)
    }

    fn finalize(&self, document: &str, url: &Url) -> String {
        let document = ensure_doctype(document);
        let document = strip_scripts(&document);
        inject_base(&document, &self.base_href(url))
    }

    /// The configured public base if present, otherwise the target's origin,
    /// always with exactly one trailing slash.
    fn base_href(&self, url: &Url) -> String {
        let base = match &self.public_base {
            Some(base) => base.as_str().to_string(),
            None => url.origin().ascii_serialization(),
        };
        format!("{}/", base.trim_end_matches('/'))
    }
}

fn cache_buster() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis().to_string())
        .unwrap_or_default()
}

fn ensure_doctype(document: &str) -> String {
    if document.trim_start().get(..9).is_some_and(|head| head.eq_ignore_ascii_case("<!doctype")) {
        document.to_string()
    } else {
        format!("<!DOCTYPE html>\n{document}")
    }
}

/// Removes every script tag so the snapshot cannot execute code in whatever
/// context later renders it.
pub(crate) fn strip_scripts(document: &str) -> String {
    SCRIPT_REGEX.replace_all(document, "").into_owned()
}

/// Inserts `<base href="…">` as the first child of `<head>`. Documents
/// without a head tag pass through unchanged.
pub(crate) fn inject_base(document: &str, href: &str) -> String {
    HEAD_REGEX
        .replace(document, |caps: &regex::Captures<'_>| {
            format!("{}<base href=\"{href}\">", &caps[0])
        })
        .into_owned()
}
