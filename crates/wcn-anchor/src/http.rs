//! Shared HTTP plumbing for the REST and JSON-RPC bindings

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use wcn_core::config::AnchorConfig;
use wcn_core::{Inscription, NotaryError, NotaryResult};

/// Base delay before the first connect retry; doubles per attempt.
const CONNECT_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    connect_retries: u32,
}

impl HttpClient {
    pub fn new(cfg: &AnchorConfig) -> NotaryResult<Self> {
        let http = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| NotaryError::Config(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            connect_retries: cfg.connect_retries,
        })
    }

    /// POST `body` as JSON and decode a JSON response.
    ///
    /// Only connection failures are retried: such a request never reached the
    /// provider, so retrying cannot create a duplicate inscription.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> NotaryResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut attempt = 0u32;
        loop {
            match self.http.post(url).json(body).send().await {
                Ok(response) => return handle_response(url, response).await,
                Err(e) if e.is_connect() && attempt < self.connect_retries => {
                    let delay = CONNECT_BACKOFF * 2u32.pow(attempt);
                    attempt += 1;
                    warn!(
                        url = %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "anchor endpoint unreachable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(NotaryError::Anchor(format!("request to {url} failed: {e}")));
                }
            }
        }
    }
}

async fn handle_response<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> NotaryResult<T> {
    let status = response.status();
    debug!(url = %url, status = status.as_u16(), "anchor response");

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| NotaryError::Anchor(format!("invalid response body from {url}: {e}")))
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(NotaryError::Anchor(format!(
            "{url} rejected the request credentials ({status})"
        )))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(NotaryError::Anchor(format!("{url} returned {status}: {body}")))
    }
}

/// Receipt body shared by both bindings: `{inscriptionId | id, txid?, fee?}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Receipt {
    #[serde(default)]
    inscription_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    txid: Option<String>,
    #[serde(default)]
    fee: Option<f64>,
}

impl Receipt {
    pub(crate) fn into_inscription(self, binding: &str) -> NotaryResult<Inscription> {
        let inscription_id = self
            .inscription_id
            .or(self.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                NotaryError::Anchor(format!("{binding} response carried no inscription id"))
            })?;

        Ok(Inscription {
            inscription_id,
            txid: self.txid,
            cost_estimate: self.fee,
        })
    }
}
