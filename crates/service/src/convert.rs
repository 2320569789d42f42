//! The conversion endpoint.
//!
//! `POST /html-to-pdf` accepts a JSON body with the snapshot HTML and an
//! optional filename, runs it through the PDF engine under a bounded
//! timeout, and streams back the bytes with download headers. Every request
//! walks the same phase sequence, logged as it goes, so a stuck conversion
//! is diagnosable from the last phase that appeared.

use crate::AppState;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use derive_more::Display;
use serde_json::Value;
use tracing::instrument;

/// Conversion lifecycle phases, in order.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Phase {
    #[display("received")]
    Received,
    #[display("validating")]
    Validating,
    #[display("browser-launching")]
    BrowserLaunching,
    #[display("pdf-exporting")]
    PdfExporting,
    #[display("responding")]
    Responding,
    #[display("failed")]
    Failed,
}

#[instrument(skip_all)]
pub async fn html_to_pdf(
    State(state): State<AppState>,
    payload: Result<axum::Json<Value>, JsonRejection>,
) -> Response {
    tracing::info!(phase = %Phase::Received, "conversion requested");

    // Validation is the handler's job in full: a malformed body, a missing
    // `html`, and a non-string `html` all answer the same 400.
    tracing::debug!(phase = %Phase::Validating);
    let body = match payload {
        Ok(axum::Json(body)) => body,
        Err(rejection) => {
            tracing::warn!(phase = %Phase::Failed, error = %rejection, "request body is not valid JSON");
            return (StatusCode::BAD_REQUEST, "Missing html").into_response();
        }
    };
    let Some(html) =
        body.get("html").and_then(Value::as_str).filter(|html| !html.trim().is_empty())
    else {
        tracing::warn!(phase = %Phase::Failed, "request body has no html string");
        return (StatusCode::BAD_REQUEST, "Missing html").into_response();
    };

    tracing::debug!(phase = %Phase::BrowserLaunching, bytes = html.len());
    let outcome = tokio::time::timeout(state.settings.request_timeout, async {
        let result = state.engine.convert(html).await;
        tracing::debug!(phase = %Phase::PdfExporting);
        result
    })
    .await;

    let pdf = match outcome {
        Err(_elapsed) => {
            tracing::error!(
                phase = %Phase::Failed,
                timeout = ?state.settings.request_timeout,
                "conversion exceeded the request timeout"
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "PDF generation timed out")
                .into_response();
        }
        Ok(Err(err)) => {
            tracing::error!(phase = %Phase::Failed, error = %err, "conversion failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Render error").into_response();
        }
        Ok(Ok(pdf)) => pdf,
    };

    let filename = resolve_filename(
        body.get("filename").and_then(Value::as_str),
        &state.settings.default_filename,
    );
    tracing::info!(phase = %Phase::Responding, bytes = pdf.len(), filename);
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}.pdf\"")),
            (header::CONTENT_LENGTH, pdf.len().to_string()),
        ],
        pdf,
    )
        .into_response()
}

/// The download filename without extension: the request's if usable, the
/// configured default otherwise. Path separators, quotes, and control
/// characters never survive into the Content-Disposition header.
fn resolve_filename(requested: Option<&str>, default: &str) -> String {
    let sanitized: Option<String> = requested.map(|name| {
        name.trim()
            .trim_end_matches(".pdf")
            .chars()
            .filter(|c| !matches!(c, '/' | '\\' | '"' | ';') && !c.is_control())
            .collect()
    });
    match sanitized {
        Some(name) if !name.trim().is_empty() => name,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "resume")]
    #[case(Some(""), "resume")]
    #[case(Some("   "), "resume")]
    #[case(Some("cv-2026"), "cv-2026")]
    #[case(Some("cv.pdf"), "cv")]
    #[case(Some("../../etc/passwd"), "....etcpasswd")]
    #[case(Some("a\"b"), "ab")]
    fn test_resolve_filename(#[case] requested: Option<&str>, #[case] expected: &str) {
        assert_eq!(resolve_filename(requested, "resume"), expected);
    }
}
