//! The print route.
//!
//! `GET /print/resume` serves a chromeless rendering of the configured
//! profile, parameterized by the same query string the interactive site
//! uses. This is the page the snapshot extractor loads and polls.

use crate::AppState;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::instrument;

#[instrument(skip_all, fields(query = query.as_deref().unwrap_or_default()))]
pub async fn print_resume(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let params = folio_params::codec::parse(query.as_deref());
    match state.renderer.render(&state.profile, &params) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "print rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Render error").into_response()
        }
    }
}
