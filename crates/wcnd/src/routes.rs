//! HTTP routes
//!
//! Endpoints:
//!   GET  /health             liveness, `{status, ts}`
//!   POST /notarize           run the engine on a path, URL or inline bytes
//!   POST /verify             check a document against its attestation
//!   GET  /inscription/{id}   local inscription info
//!   GET  /metrics            Prometheus text format

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    routing::{get, post},
    Json, Router,
};
use base64::Engine as _;
use prometheus_client::registry::Registry;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use wcn_anchor::{inscription_info, InscriptionInfo};
use wcn_core::config::WcnConfig;
use wcn_core::NotaryError;
use wcn_notary::request::now_timestamp;
use wcn_notary::{notarize, verify_document, NotaryConfig, VerificationResult};

use crate::api::{ApiError, NotarizeBody, NotarizeResponse, VerifyBody};
use crate::metrics::{metrics_handler, new_registry, NotaryMetrics};

/// Per-process state shared by every request; nothing in it is mutated by a
/// notarization except the counters.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WcnConfig>,
    pub registry: Arc<Registry>,
    pub metrics: NotaryMetrics,
}

impl AppState {
    pub fn new(config: Arc<WcnConfig>) -> Self {
        let (registry, metrics) = new_registry();
        Self {
            config,
            registry,
            metrics,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.daemon.max_body_bytes;
    Router::new()
        .route("/health", get(health))
        .route("/notarize", post(notarize_handler))
        .route("/verify", post(verify_handler))
        .route("/inscription/{id}", get(inscription_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "ts": now_timestamp() }))
}

async fn notarize_handler(
    State(state): State<AppState>,
    Json(body): Json<NotarizeBody>,
) -> Result<Json<NotarizeResponse>, ApiError> {
    let outcome = run_notarize(&state, body).await;
    state
        .metrics
        .notarize_request(if outcome.is_ok() { "ok" } else { "error" });
    outcome.map(Json)
}

async fn run_notarize(state: &AppState, body: NotarizeBody) -> Result<NotarizeResponse, ApiError> {
    let title = body
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| NotaryError::Config("title is required".into()))?;

    let (raw, detected_mime) = match (body.file_path.as_deref(), body.content_base64.as_deref()) {
        (Some(source), _) => {
            let timeout = Duration::from_secs(state.config.anchor.timeout_secs);
            let loaded = wcn_notary::load_with_timeout(source, timeout).await?;
            (loaded.bytes, Some(loaded.mime_type))
        }
        (None, Some(encoded)) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| NotaryError::Config(format!("content_base64 is not valid base64: {e}")))?;
            (bytes, None)
        }
        (None, None) => {
            return Err(NotaryError::Config(
                "either file_path or content_base64 is required".into(),
            )
            .into())
        }
    };

    let cfg = &state.config;
    let mut request = NotaryConfig::from_defaults(title, &cfg.notary, &cfg.crypto);
    if let Some(mode) = body.privacy_mode {
        request.privacy_mode = mode;
    }
    request.recipient_key = body.recipient_key.map(SecretString::from);
    if let Some(kb) = body.max_inline_kb {
        request.max_inline_kb = kb;
    }
    if let Some(kb) = body.chunk_kb {
        request.chunk_kb = kb;
    }
    if let Some(ns) = body.namespace {
        request.namespace = ns;
    }
    if let Some(author) = body.author {
        request.author = author;
    }
    if let Some(ts) = body.timestamp {
        request.timestamp = ts;
    }
    request.mime_type = body.mime_type.or(detected_mime);
    request.dry_run = body.dry_run;

    info!(
        title = %request.title,
        bytes = raw.len(),
        privacy = request.privacy_mode.as_str(),
        dry_run = request.dry_run,
        "notarize request"
    );

    let result = notarize(&request, &raw, &cfg.anchor, None).await?;
    state
        .metrics
        .inscriptions(&result.provider, result.inscription_count() as u64);

    Ok(NotarizeResponse {
        summary: result.summary(),
        attestation: result.attestation,
        manifest: result.manifest,
    })
}

async fn verify_handler(
    Json(body): Json<VerifyBody>,
) -> Result<Json<VerificationResult>, ApiError> {
    let result = verify_document(&body.file_path, &body.attestation, body.manifest.as_ref()).await?;
    Ok(Json(result))
}

async fn inscription_handler(Path(id): Path<String>) -> Json<InscriptionInfo> {
    Json(inscription_info(&id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use base64::Engine as _;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(Arc::new(WcnConfig::default())))
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = call(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["ts"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn dry_run_notarize_inline_content() {
        let req = post_json(
            "/notarize",
            json!({
                "title": "Doc A",
                "content_base64": "aGVsbG8gd2Nu",
                "dry_run": true,
                "timestamp": "2024-05-01T12:00:00.000Z"
            }),
        );
        let (status, body) = call(app(), req).await;

        assert_eq!(status, StatusCode::OK, "body: {body}");
        assert_eq!(body["mode"], "full");
        assert!(body["attestation_insc"].as_str().unwrap().starts_with("sim-"));
        assert_eq!(body["attestation"]["title"], "Doc A");
        assert_eq!(body["attestation"]["doc_hash"], body["doc_hash"]);
        assert_eq!(body["ts"], "2024-05-01T12:00:00.000Z");
        assert!(body["manifest"].is_null());
    }

    #[tokio::test]
    async fn multi_mebibyte_inline_content_is_chunked() {
        let raw: Vec<u8> = (0..2 * 1024 * 1024u32).map(|i| (i % 251) as u8).collect();
        let req = post_json(
            "/notarize",
            json!({
                "title": "Large",
                "content_base64": base64::engine::general_purpose::STANDARD.encode(&raw),
                "dry_run": true
            }),
        );
        let (status, body) = call(app(), req).await;

        assert_eq!(status, StatusCode::OK, "body: {body}");
        assert_eq!(body["mode"], "chunked");
        assert_eq!(body["manifest"]["doc"]["bytes"], raw.len());
    }

    #[tokio::test]
    async fn body_over_configured_limit_is_rejected() {
        let mut config = WcnConfig::default();
        config.daemon.max_body_bytes = 1024;
        let app = router(AppState::new(Arc::new(config)));
        let req = post_json(
            "/notarize",
            json!({ "title": "Big", "content_base64": "A".repeat(4096), "dry_run": true }),
        );
        let (status, _) = call(app, req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn missing_title_is_bad_request() {
        let req = post_json("/notarize", json!({ "content_base64": "AA==", "dry_run": true }));
        let (status, body) = call(app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("title"));
    }

    #[tokio::test]
    async fn encrypted_without_key_is_bad_request() {
        let req = post_json(
            "/notarize",
            json!({
                "title": "Sealed",
                "content_base64": "AA==",
                "privacy_mode": "encrypted",
                "dry_run": true
            }),
        );
        let (status, _) = call(app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let req = post_json(
            "/notarize",
            json!({ "title": "Gone", "file_path": "/nonexistent/wcn/doc.pdf", "dry_run": true }),
        );
        let (status, _) = call(app(), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn notarize_then_verify_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, b"verify me").unwrap();
        let path = path.to_str().unwrap().to_string();

        let app = app();
        let (status, notarized) = call(
            app.clone(),
            post_json(
                "/notarize",
                json!({ "title": "Doc", "file_path": path, "dry_run": true }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, verdict) = call(
            app.clone(),
            post_json(
                "/verify",
                json!({ "file_path": path, "attestation": notarized["attestation"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verdict["verified"], true);
        assert_eq!(verdict["mode"], "full");

        std::fs::write(&path, b"verify me!").unwrap();
        let (_, verdict) = call(
            app,
            post_json(
                "/verify",
                json!({ "file_path": path, "attestation": notarized["attestation"] }),
            ),
        )
        .await;
        assert_eq!(verdict["verified"], false);
        assert!(verdict["reason"].is_string());
    }

    #[tokio::test]
    async fn inscription_info_for_simulated_id() {
        let req = Request::get("/inscription/sim-wcn-ins-full-abc")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["inscriptionId"], "sim-wcn-ins-full-abc");
        assert_eq!(body["status"], "simulated");
    }

    #[tokio::test]
    async fn metrics_count_requests_and_inscriptions() {
        let app = app();
        let req = post_json(
            "/notarize",
            json!({ "title": "Counted", "content_base64": "AA==", "dry_run": true }),
        );
        let (status, _) = call(app.clone(), req).await;
        assert_eq!(status, StatusCode::OK);

        let resp = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let text = String::from_utf8(
            to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap()
                .to_vec(),
        )
        .unwrap();
        assert!(text.contains(r#"wcn_notarize_requests_total{outcome="ok"} 1"#));
        assert!(text.contains(r#"wcn_inscriptions_total{provider="simulated"} 2"#));
    }
}
