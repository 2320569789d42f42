//! Liveness endpoint.

use axum::Json;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// `GET /health`: always `200 OK` with a current timestamp, suitable for
/// load balancer checks and cold-start warmup pings.
pub async fn health() -> Json<Value> {
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    Json(json!({ "status": "ok", "timestamp": timestamp }))
}
