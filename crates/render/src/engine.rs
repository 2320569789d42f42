//! The async conversion engine.
//!
//! The browser protocol client is blocking, so each conversion runs on the
//! blocking thread pool. Callers only see [`HtmlToPdf`], which lets the
//! service layer swap in a mock engine under test.

use crate::error::{ErrorKind, Result};
use crate::launch::Launch;
use crate::session::PrintOptions;
use async_trait::async_trait;
use folio_config::BrowserConfig;
use std::sync::Arc;
use tracing::instrument;

/// Converts a self-contained HTML document into PDF bytes.
#[async_trait]
pub trait HtmlToPdf: Send + Sync {
    async fn convert(&self, html: &str) -> Result<Vec<u8>>;
}

/// Chrome-backed engine. One short-lived browser session per conversion.
pub struct ChromePdf {
    launcher: Arc<dyn Launch>,
    options: PrintOptions,
}

impl ChromePdf {
    pub fn new(launcher: Arc<dyn Launch>, options: PrintOptions) -> Self {
        Self { launcher, options }
    }

    pub fn from_config(browser: &BrowserConfig, options: PrintOptions) -> Self {
        Self::new(crate::launch::from_config(browser), options)
    }
}

#[async_trait]
impl HtmlToPdf for ChromePdf {
    #[instrument(skip_all, fields(strategy = self.launcher.name()))]
    async fn convert(&self, html: &str) -> Result<Vec<u8>> {
        let launcher = Arc::clone(&self.launcher);
        let options = self.options.clone();
        let html = html.to_owned();
        let task = tokio::task::spawn_blocking(move || {
            let session = launcher.launch()?;
            let result = session.print_html(&html, &options);
            // The session closes before the result is inspected, so a failed
            // export can never leak a browser process.
            session.close();
            result
        });
        match task.await {
            Ok(result) => result,
            Err(err) => exn::bail!(ErrorKind::Export(format!("conversion task failed: {err}"))),
        }
    }
}
