//! The PDF conversion service.
//!
//! A small axum application with three routes: `POST /html-to-pdf` converts
//! snapshot HTML into a PDF download, `GET /print/resume` serves the
//! chromeless resume rendering that snapshots are taken from, and
//! `GET /health` answers liveness checks. Conversion goes through the
//! [`HtmlToPdf`] seam so tests can run the full HTTP surface without a
//! browser.

pub mod convert;
pub mod error;
pub mod health;
pub mod print;

use crate::error::{ErrorKind, Result};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use exn::ResultExt;
use folio_config::Config;
use folio_render::{ChromePdf, HtmlToPdf, PrintOptions};
use folio_resume::{Profile, ResumeRenderer};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn HtmlToPdf>,
    pub renderer: Arc<ResumeRenderer>,
    pub profile: Arc<Profile>,
    pub settings: Arc<Settings>,
}

/// Per-request behaviour settings, fixed at startup.
pub struct Settings {
    pub default_filename: String,
    pub request_timeout: Duration,
}

/// Builds the router. `cors_origin` restricts cross-origin access to one
/// origin; `None` allows any, for local development.
pub fn app(state: AppState, cors_origin: Option<&str>) -> Result<Router> {
    let cors = cors_layer(cors_origin)?;
    Ok(Router::new()
        .route("/html-to-pdf", post(convert::html_to_pdf))
        .route("/health", get(health::health))
        .route("/print/resume", get(print::print_resume))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);
    match origin {
        Some(origin) => {
            let value = origin
                .parse::<HeaderValue>()
                .or_raise(|| ErrorKind::Cors(origin.to_string()))?;
            Ok(layer.allow_origin(value))
        }
        None => Ok(layer.allow_origin(Any)),
    }
}

/// Runs the service until the accept loop terminates.
pub async fn serve(config: &Config) -> Result<()> {
    let renderer = ResumeRenderer::new().map_err(|err| err.raise(ErrorKind::Renderer))?;
    let profile = match &config.service.profile {
        Some(path) => Profile::from_file(path).map_err(|err| err.raise(ErrorKind::Profile))?,
        None => Profile::sample().map_err(|err| err.raise(ErrorKind::Profile))?,
    };
    let options = PrintOptions {
        paper: config.service.paper,
        print_background: true,
        settle: Duration::from_millis(config.browser.settle_delay),
    };
    let state = AppState {
        engine: Arc::new(ChromePdf::from_config(&config.browser, options)),
        renderer: Arc::new(renderer),
        profile: Arc::new(profile),
        settings: Arc::new(Settings {
            default_filename: config.service.default_filename.clone(),
            request_timeout: Duration::from_secs(config.service.request_timeout),
        }),
    };
    let router = app(state, config.service.cors_origin.as_deref())?;
    let listener = tokio::net::TcpListener::bind(&config.service.listen)
        .await
        .or_raise(|| ErrorKind::Bind(config.service.listen.clone()))?;
    tracing::info!(listen = %config.service.listen, "conversion service listening");
    axum::serve(listener, router)
        .await
        .or_raise(|| ErrorKind::Serve(config.service.listen.clone()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use folio_render::error::{ErrorKind as RenderErrorKind, Result as RenderResult};
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct StaticPdf(Vec<u8>);

    #[async_trait]
    impl HtmlToPdf for StaticPdf {
        async fn convert(&self, _html: &str) -> RenderResult<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    struct FailingPdf;

    #[async_trait]
    impl HtmlToPdf for FailingPdf {
        async fn convert(&self, _html: &str) -> RenderResult<Vec<u8>> {
            exn::bail!(RenderErrorKind::Export("boom".to_string()))
        }
    }

    /// Engine that never finishes in time; its browser guard counts closes.
    struct SlowPdf {
        closes: Arc<AtomicUsize>,
    }

    struct CloseGuard(Arc<AtomicUsize>);

    impl Drop for CloseGuard {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl HtmlToPdf for SlowPdf {
        async fn convert(&self, _html: &str) -> RenderResult<Vec<u8>> {
            let _session = CloseGuard(Arc::clone(&self.closes));
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    fn state(engine: Arc<dyn HtmlToPdf>, timeout: Duration) -> AppState {
        AppState {
            engine,
            renderer: Arc::new(ResumeRenderer::new().unwrap()),
            profile: Arc::new(Profile::sample().unwrap()),
            settings: Arc::new(Settings {
                default_filename: "resume".to_string(),
                request_timeout: timeout,
            }),
        }
    }

    fn router(engine: Arc<dyn HtmlToPdf>) -> Router {
        app(state(engine, Duration::from_secs(30)), None).unwrap()
    }

    fn convert_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/html-to-pdf")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_ok_with_timestamp() {
        let response = router(Arc::new(StaticPdf(b"%PDF-1.7".to_vec())))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].as_str().unwrap().contains('T'));
    }

    #[rstest::rstest]
    #[case(r#"{}"#)]
    #[case(r#"{"html": ""}"#)]
    #[case(r#"{"html": "   "}"#)]
    #[case(r#"{"html": 42}"#)]
    #[case(r#"{"html": null}"#)]
    #[case("not json at all")]
    #[tokio::test]
    async fn test_missing_html_is_bad_request(#[case] body: &str) {
        let response = router(Arc::new(StaticPdf(Vec::new())))
            .oneshot(convert_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing html");
    }

    #[tokio::test]
    async fn test_successful_conversion_has_download_headers() {
        let pdf = b"%PDF-1.7 fake body".to_vec();
        let response = router(Arc::new(StaticPdf(pdf.clone())))
            .oneshot(convert_request(r#"{"html": "<html><body>hi</body></html>"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers().clone();
        assert_eq!(headers["content-type"], "application/pdf");
        assert_eq!(headers["content-disposition"], "attachment; filename=\"resume.pdf\"");
        assert_eq!(headers["content-length"], pdf.len().to_string().as_str());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), pdf.as_slice());
    }

    #[tokio::test]
    async fn test_requested_filename_wins_over_default() {
        let response = router(Arc::new(StaticPdf(b"%PDF".to_vec())))
            .oneshot(convert_request(r#"{"html": "<p>x</p>", "filename": "cv-2026"}"#))
            .await
            .unwrap();
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"cv-2026.pdf\""
        );
    }

    #[tokio::test]
    async fn test_engine_failure_is_internal_error() {
        let response =
            router(Arc::new(FailingPdf)).oneshot(convert_request(r#"{"html": "<p>x</p>"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Render error");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_responds_500_and_closes_browser_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let app = app(
            state(Arc::new(SlowPdf { closes: Arc::clone(&closes) }), Duration::from_millis(50)),
            None,
        )
        .unwrap();
        let response = app.oneshot(convert_request(r#"{"html": "<p>x</p>"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "PDF generation timed out");
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let response = router(Arc::new(StaticPdf(Vec::new())))
            .oneshot(Request::builder().uri("/html-to-pdf").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_print_route_serves_marked_document() {
        let response = router(Arc::new(StaticPdf(Vec::new())))
            .oneshot(
                Request::builder()
                    .uri("/print/resume?order=projects,summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
        let html = body_text(response).await;
        assert!(html.contains("id=\"resume-content\""));
        let projects = html.find("class=\"resume-section resume-projects").unwrap();
        let summary = html.find("class=\"resume-section resume-summary").unwrap();
        assert!(projects < summary);
    }

    #[tokio::test]
    async fn test_preflight_allows_configured_origin() {
        let app = app(
            state(Arc::new(StaticPdf(Vec::new())), Duration::from_secs(30)),
            Some("https://example.dev"),
        )
        .unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/html-to-pdf")
                    .header("origin", "https://example.dev")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://example.dev"
        );
    }

    #[tokio::test]
    async fn test_preflight_denies_other_origins() {
        let app = app(
            state(Arc::new(StaticPdf(Vec::new())), Duration::from_secs(30)),
            Some("https://example.dev"),
        )
        .unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/html-to-pdf")
                    .header("origin", "https://elsewhere.dev")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }

    #[test]
    fn test_invalid_cors_origin_is_config_error() {
        let err = cors_layer(Some("not\na\nheader")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Cors(_)));
    }
}
