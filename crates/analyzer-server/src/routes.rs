//! HTTP surface: analyze, upload, scan, and liveness endpoints.

use std::sync::Arc;

use analyzer_core::pipeline::{AnalyzeError, Analyzer};
use analyzer_core::verdict::{RiskLevel, Verdict};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

pub type SharedAnalyzer = Arc<Analyzer>;

/// Build the application router. CORS is permissive: the API fronts a
/// browser client served from a different origin.
pub fn router(analyzer: SharedAnalyzer, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/status", get(status))
        .route("/api/analyze", post(analyze))
        .route("/api/upload", post(analyze_upload))
        .route("/api/scan", post(analyze_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(analyzer)
}

async fn home() -> Json<Value> {
    Json(json!({ "message": "URL analyzer API is running" }))
}

async fn status() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    level: RiskLevel,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extracted_url: Option<String>,
}

impl AnalyzeResponse {
    fn new(verdict: Verdict, extracted_url: Option<String>) -> Self {
        Self { level: verdict.level, message: verdict.message, extracted_url }
    }
}

/// Classify a raw URL supplied as JSON.
async fn analyze(
    State(analyzer): State<SharedAnalyzer>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let verdict = run_blocking(move || analyzer.analyze_url(&request.url)).await?;
    Ok(Json(AnalyzeResponse::new(verdict, None)))
}

/// Decode an uploaded QR image and classify its payload. Serves both the
/// upload and scan endpoints; the response echoes the recovered URL.
async fn analyze_upload(
    State(analyzer): State<SharedAnalyzer>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let bytes = read_file_field(multipart).await?;

    let (url, verdict) = run_blocking(move || {
        let url = analyzer.extract_url(&bytes)?;
        let verdict = analyzer.analyze_url(&url)?;
        Ok((url, verdict))
    })
    .await?;

    Ok(Json(AnalyzeResponse::new(verdict, Some(url))))
}

/// Pull the bytes of the `file` field out of a multipart body.
async fn read_file_field(mut multipart: Multipart) -> Result<Vec<u8>, AnalyzeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalyzeError::Internal(anyhow::Error::new(e)))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AnalyzeError::Internal(anyhow::Error::new(e)))?;
            if data.is_empty() {
                return Err(AnalyzeError::MissingInput);
            }
            return Ok(data.to_vec());
        }
    }

    Err(AnalyzeError::MissingInput)
}

/// The pipeline blocks on SQLite and ONNX; keep it off the async workers.
async fn run_blocking<T>(
    f: impl FnOnce() -> Result<T, AnalyzeError> + Send + 'static,
) -> Result<T, AnalyzeError>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AnalyzeError::Internal(anyhow::anyhow!("analysis task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use analyzer_core::blocklist::BlocklistStore;
    use analyzer_core::features::NUM_FEATURES;
    use analyzer_core::inference::{Probabilities, Standardizer, UrlScorer};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct StubScorer {
        probs: Probabilities,
    }

    impl UrlScorer for StubScorer {
        fn predict_proba(
            &self,
            _standardized: &[f32; NUM_FEATURES],
        ) -> anyhow::Result<Probabilities> {
            Ok(self.probs)
        }
    }

    fn test_router(safe: f32, malicious: f32, blocklisted: &[&str]) -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocklist.db");

        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute("CREATE TABLE processed_urls (url TEXT NOT NULL, label INTEGER)", [])
            .unwrap();
        for url in blocklisted {
            conn.execute("INSERT INTO processed_urls (url, label) VALUES (?1, 1)", [url])
                .unwrap();
        }

        let analyzer = Arc::new(Analyzer::new(
            BlocklistStore::open(&path).unwrap(),
            Standardizer { mean: [0.0; NUM_FEATURES], scale: [1.0; NUM_FEATURES] },
            Arc::new(StubScorer { probs: Probabilities { safe, malicious } }),
        ));

        (router(analyzer, 1024 * 1024), dir)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn qr_png(payload: &str) -> Vec<u8> {
        let code = qrcode::QrCode::new(payload.as_bytes()).unwrap();
        let img = code
            .render::<image::Luma<u8>>()
            .min_dimensions(200, 200)
            .build();

        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn multipart_post(uri: &str, file_bytes: &[u8]) -> Request<Body> {
        const BOUNDARY: &str = "test-boundary";

        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"qr.png\"\r\n\
              Content-Type: image/png\r\n\r\n",
        );
        body.extend_from_slice(file_bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn status_reports_ok() {
        let (app, _dir) = test_router(80.0, 20.0, &[]);

        let response = app
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn empty_url_is_rejected_with_400() {
        let (app, _dir) = test_router(80.0, 20.0, &[]);

        let response = app
            .oneshot(json_post("/api/analyze", r#"{"url": ""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn scored_url_returns_level_and_message() {
        let (app, _dir) = test_router(80.0, 20.0, &[]);

        let response = app
            .oneshot(json_post("/api/analyze", r#"{"url": "https://example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["level"], "safe");
        assert!(body["message"].is_string());
        assert!(body.get("extracted_url").is_none());
    }

    #[tokio::test]
    async fn blocklisted_url_is_danger() {
        let (app, _dir) = test_router(99.0, 1.0, &["http://malware.example/payload"]);

        let response = app
            .oneshot(json_post("/api/analyze", r#"{"url": "http://malware.example/payload"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["level"], "danger");
    }

    #[tokio::test]
    async fn upload_echoes_extracted_url() {
        let (app, _dir) = test_router(80.0, 20.0, &[]);

        let response = app
            .oneshot(multipart_post("/api/upload", &qr_png("https://example.com/login")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["level"], "safe");
        assert_eq!(body["extracted_url"], "https://example.com/login");
    }

    #[tokio::test]
    async fn scan_rejects_image_without_qr() {
        let (app, _dir) = test_router(80.0, 20.0, &[]);

        let blank = image::GrayImage::from_pixel(64, 64, image::Luma([255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(blank)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let response = app.oneshot(multipart_post("/api/scan", &bytes)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_with_empty_file_is_400() {
        let (app, _dir) = test_router(80.0, 20.0, &[]);

        let response = app
            .oneshot(multipart_post("/api/upload", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
