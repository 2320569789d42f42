//! End-to-end PDF delivery.
//!
//! The client snapshots a live resume document, posts the snapshot to the
//! conversion service, and saves the returned bytes to disk. Progress is
//! reported through a caller-supplied callback; on any failure the terminal
//! [`PdfProgress::Error`] milestone is emitted before the error propagates.

use crate::error::{ErrorKind, Result};
use crate::progress::PdfProgress;
use exn::ResultExt;
use folio_config::ClientConfig;
use folio_snapshot::{Extractor, HttpFrame};
use reqwest::header;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::instrument;
use url::Url;

/// How many characters of an unexpected response body to log.
const DIAGNOSTIC_PREVIEW: usize = 300;

/// Per-delivery options; configuration holds the cross-delivery settings.
#[derive(Clone, Debug, Default)]
pub struct DeliveryOptions {
    /// Download filename without extension. The service default applies
    /// when unset.
    pub filename: Option<String>,
    /// Directory the PDF is saved into. Defaults to the working directory.
    pub output_dir: Option<PathBuf>,
    /// Hand the saved file to the platform opener once written.
    pub open_after_save: bool,
}

#[derive(Serialize)]
struct ConvertPayload<'a> {
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<&'a str>,
}

/// The PDF delivery client. Cheap to construct; reusable across deliveries.
pub struct PdfClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl PdfClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Snapshots `source_url`, converts it, and saves the PDF, returning the
    /// written path.
    ///
    /// Progress milestones arrive in order; [`PdfProgress::Done`] and
    /// [`PdfProgress::Error`] are mutually exclusive terminals.
    #[instrument(skip_all, fields(url = %source_url))]
    pub async fn download_resume_as_pdf(
        &self,
        source_url: &Url,
        options: &DeliveryOptions,
        progress: &dyn Fn(PdfProgress),
    ) -> Result<PathBuf> {
        match self.deliver(source_url, options, progress).await {
            Ok(path) => {
                progress(PdfProgress::Done);
                Ok(path)
            }
            Err(err) => {
                progress(PdfProgress::Error);
                Err(err)
            }
        }
    }

    async fn deliver(
        &self,
        source_url: &Url,
        options: &DeliveryOptions,
        progress: &dyn Fn(PdfProgress),
    ) -> Result<PathBuf> {
        // Prepare covers endpoint resolution, so a configuration failure
        // still reports which stage it happened in.
        progress(PdfProgress::Prepare);
        let service_url =
            self.config.require_service_url().map_err(|err| err.raise(ErrorKind::Config))?;
        let public_base = match self.config.public_base_url.as_deref() {
            Some(base) => Some(Url::parse(base).or_raise(|| ErrorKind::Config)?),
            None => None,
        };

        let mut frame = HttpFrame::new().map_err(|err| err.raise(ErrorKind::Snapshot))?;
        let extractor = Extractor::new().with_public_base(public_base);
        let html = extractor
            .extract(&mut frame, source_url)
            .await
            .map_err(|err| err.raise(ErrorKind::Snapshot))?;

        progress(PdfProgress::Converting);
        let payload = ConvertPayload { html: &html, filename: options.filename.as_deref() };
        let response = match self
            .http
            .post(service_url)
            .header(header::ACCEPT, "application/pdf")
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => exn::bail!(ErrorKind::Network(err.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "conversion service rejected the snapshot");
            exn::bail!(ErrorKind::ServiceStatus(status.as_u16()));
        }
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("application/pdf") {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                content_type,
                preview = preview(&body),
                "conversion service returned a non-PDF body"
            );
            exn::bail!(ErrorKind::NotPdf);
        }
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => exn::bail!(ErrorKind::Network(err.to_string())),
        };
        if bytes.is_empty() {
            tracing::error!("conversion service returned a zero-length PDF");
            exn::bail!(ErrorKind::EmptyBody);
        }

        progress(PdfProgress::Saving);
        let path = self.output_path(options)?;
        std::fs::write(&path, &bytes).or_raise(|| ErrorKind::Io)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "pdf saved");
        if options.open_after_save {
            open_file(&path);
        }
        Ok(path)
    }

    fn output_path(&self, options: &DeliveryOptions) -> Result<PathBuf> {
        let name = options
            .filename
            .as_deref()
            .map(|name| name.trim().trim_end_matches(".pdf"))
            .filter(|name| !name.is_empty())
            .unwrap_or("resume");
        let dir = match &options.output_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().or_raise(|| ErrorKind::Io)?,
        };
        Ok(dir.join(format!("{name}.pdf")))
    }
}

/// Best-effort handoff to the platform opener; failure only logs.
fn open_file(path: &Path) {
    let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
    if let Err(err) = std::process::Command::new(opener).arg(path).spawn() {
        tracing::warn!(error = %err, opener, "could not open the saved pdf");
    }
}

fn preview(body: &str) -> &str {
    let mut end = DIAGNOSTIC_PREVIEW.min(body.len());
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
