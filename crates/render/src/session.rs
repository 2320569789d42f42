//! A single headless-browser session.
//!
//! One session serves exactly one conversion: launch, print, close. There is
//! no pooling or instance reuse; every request pays the full browser
//! cold-start cost, trading throughput for a simple resource model in which
//! a browser process can never outlive its triggering request.

use crate::error::{ErrorKind, Result};
use folio_config::Paper;
use headless_chrome::protocol::cdp::Emulation;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// Launch flags for containerized/restricted execution environments. This is
/// a portability requirement, not a security stance: the service renders HTML
/// from a single trusted client.
pub const LAUNCH_ARGS: [&str; 4] =
    ["--no-sandbox", "--disable-setuid-sandbox", "--disable-gpu", "--disable-dev-shm-usage"];

/// How a page is exported to PDF.
#[derive(Clone, Debug)]
pub struct PrintOptions {
    pub paper: Paper,
    pub print_background: bool,
    /// How long subresources get to settle after navigation, before export.
    pub settle: Duration,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { paper: Paper::default(), print_background: true, settle: Duration::from_millis(500) }
    }
}

/// A launched browser process, closed exactly once when the session drops.
pub struct BrowserSession {
    browser: Browser,
    strategy: &'static str,
}

impl BrowserSession {
    pub(crate) fn launch(path: PathBuf, strategy: &'static str) -> Result<Self> {
        let builder = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(Some(path))
            .args(LAUNCH_ARGS.iter().map(OsStr::new).collect())
            .build();
        let options = match builder {
            Ok(options) => options,
            Err(err) => exn::bail!(ErrorKind::Launch(err.to_string())),
        };
        let browser = chrome(Browser::new(options), ErrorKind::Launch)?;
        tracing::info!(strategy, "headless browser launched");
        Ok(Self { browser, strategy })
    }

    /// Loads the HTML into a fresh page and exports it to PDF bytes.
    ///
    /// The HTML is persisted to a temporary file and loaded over `file://`,
    /// then given a bounded settle window so assets referenced through the
    /// snapshot's rewritten base URL can finish loading. Screen media is
    /// forced before export so print-media CSS does not unexpectedly
    /// activate.
    #[instrument(skip_all, fields(bytes = html.len()))]
    pub fn print_html(&self, html: &str, options: &PrintOptions) -> Result<Vec<u8>> {
        use exn::ResultExt;
        let mut file = tempfile::Builder::new()
            .prefix("folio-")
            .suffix(".html")
            .tempfile()
            .or_raise(|| ErrorKind::Io)?;
        file.write_all(html.as_bytes()).or_raise(|| ErrorKind::Io)?;
        file.flush().or_raise(|| ErrorKind::Io)?;
        let url = match Url::from_file_path(file.path()) {
            Ok(url) => url,
            Err(()) => exn::bail!(ErrorKind::PageLoad("temp file path is not absolute".into())),
        };

        tracing::debug!(phase = "page-rendering");
        let tab = chrome(self.browser.new_tab(), ErrorKind::PageLoad)?;
        chrome(tab.navigate_to(url.as_str()), ErrorKind::PageLoad)?;
        chrome(tab.wait_until_navigated(), ErrorKind::PageLoad)?;
        std::thread::sleep(options.settle);
        chrome(
            tab.call_method(Emulation::SetEmulatedMedia {
                media: Some("screen".to_string()),
                features: None,
            }),
            ErrorKind::PageLoad,
        )?;

        tracing::debug!(phase = "pdf-exporting");
        let (width, height) = options.paper.dimensions();
        let pdf = chrome(
            tab.print_to_pdf(Some(PrintToPdfOptions {
                print_background: Some(options.print_background),
                paper_width: Some(width),
                paper_height: Some(height),
                prefer_css_page_size: Some(false),
                ..Default::default()
            })),
            ErrorKind::Export,
        )?;
        if pdf.is_empty() {
            exn::bail!(ErrorKind::Export("export produced an empty buffer".into()));
        }
        tracing::debug!(bytes = pdf.len(), "pdf exported");
        Ok(pdf)
    }

    /// Closes the session. Dropping has the same effect; either way the
    /// close happens exactly once.
    pub fn close(self) {}
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Killing the process is handled by the browser handle's own drop;
        // failures there are logged by it, never propagated over whatever
        // error ended the session.
        tracing::debug!(strategy = self.strategy, "closing headless browser");
    }
}

fn chrome<T, E: std::fmt::Display>(
    result: std::result::Result<T, E>,
    kind: fn(String) -> ErrorKind,
) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => exn::bail!(kind(err.to_string())),
    }
}
