//! REST inscription service binding
//!
//! `POST <INSCRIBE_SERVICE_URL>` with
//! `{mimeType, label, metadata, content: base64}` and a
//! `{inscriptionId | id, txid?, fee?}` response.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::info;
use wcn_core::{Inscription, NotaryResult, BRAND_NOTES};

use crate::http::{HttpClient, Receipt};
use crate::{AnchorProvider, InscriptionRequest};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceRequest<'a> {
    mime_type: &'a str,
    label: &'a str,
    metadata: &'a str,
    content: String,
}

#[derive(Debug, Clone)]
pub struct ServiceProvider {
    client: HttpClient,
    url: String,
}

impl ServiceProvider {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl AnchorProvider for ServiceProvider {
    fn name(&self) -> &str {
        "service"
    }

    async fn inscribe(&self, request: &InscriptionRequest<'_>) -> NotaryResult<Inscription> {
        let body = ServiceRequest {
            mime_type: request.mime_type,
            label: request.label,
            metadata: BRAND_NOTES,
            content: STANDARD.encode(request.content),
        };

        let receipt: Receipt = self.client.post_json(&self.url, &body).await?;
        let inscription = receipt.into_inscription(self.name())?;

        info!(
            label = request.label,
            bytes = request.content.len(),
            inscription = %inscription.inscription_id,
            "inscribed via service"
        );
        Ok(inscription)
    }
}
