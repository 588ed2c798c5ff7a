//! JSON-RPC 2.0 binding
//!
//! Request: `{"jsonrpc":"2.0","id":<uuid>,"method":"inscribe_wcn",
//! "params":[{label, mimeType, base64, notes}]}`. A populated `error`
//! member is an anchor failure even when the HTTP status is 200.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::info;
use wcn_core::{Inscription, NotaryError, NotaryResult, BRAND_NOTES};

use crate::http::{HttpClient, Receipt};
use crate::{AnchorProvider, InscriptionRequest};

pub const RPC_METHOD: &str = "inscribe_wcn";

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: String,
    method: &'static str,
    params: [RpcParams<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RpcParams<'a> {
    label: &'a str,
    mime_type: &'a str,
    base64: String,
    notes: &'a str,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Receipt>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct RpcProvider {
    client: HttpClient,
    url: String,
}

impl RpcProvider {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl AnchorProvider for RpcProvider {
    fn name(&self) -> &str {
        "rpc"
    }

    async fn inscribe(&self, request: &InscriptionRequest<'_>) -> NotaryResult<Inscription> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: uuid::Uuid::new_v4().to_string(),
            method: RPC_METHOD,
            params: [RpcParams {
                label: request.label,
                mime_type: request.mime_type,
                base64: STANDARD.encode(request.content),
                notes: BRAND_NOTES,
            }],
        };

        let response: RpcResponse = self.client.post_json(&self.url, &body).await?;
        if let Some(err) = response.error {
            return Err(NotaryError::Anchor(match err.code {
                Some(code) => format!("RPC error {code}: {}", err.message),
                None => format!("RPC error: {}", err.message),
            }));
        }

        let inscription = response
            .result
            .unwrap_or_default()
            .into_inscription(self.name())?;

        info!(
            label = request.label,
            bytes = request.content.len(),
            inscription = %inscription.inscription_id,
            "inscribed via rpc"
        );
        Ok(inscription)
    }
}
