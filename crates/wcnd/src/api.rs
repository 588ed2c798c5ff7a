//! Request/response bodies and error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wcn_core::{NotaryError, PrivacyMode};
use wcn_notary::{Attestation, Manifest, NotarizeSummary};

#[derive(Debug, Default, Deserialize)]
pub struct NotarizeBody {
    pub file_path: Option<String>,
    pub content_base64: Option<String>,
    pub title: Option<String>,
    pub privacy_mode: Option<PrivacyMode>,
    pub recipient_key: Option<String>,
    pub max_inline_kb: Option<u32>,
    pub chunk_kb: Option<u32>,
    pub namespace: Option<String>,
    pub author: Option<String>,
    pub timestamp: Option<String>,
    pub mime_type: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct NotarizeResponse {
    #[serde(flatten)]
    pub summary: NotarizeSummary,
    pub attestation: Attestation,
    pub manifest: Option<Manifest>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
    pub file_path: String,
    pub attestation: Attestation,
    pub manifest: Option<Manifest>,
}

/// Engine error rendered as `{ "error": "..." }`
#[derive(Debug)]
pub struct ApiError(pub NotaryError);

impl From<NotaryError> for ApiError {
    fn from(e: NotaryError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            e if e.is_configuration() => StatusCode::BAD_REQUEST,
            NotaryError::NotFound(_) => StatusCode::NOT_FOUND,
            NotaryError::Anchor(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {}", self.0);
        } else {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
