//! wcn-anchor: anchor provider bindings
//!
//! The notary only needs one capability from the ledger side:
//! `inscribe(bytes, mime_type, label) -> inscription id`. This crate defines
//! that contract and its bindings:
//!   - `service`: REST inscription service (`INSCRIBE_SERVICE_URL`)
//!   - `rpc`: JSON-RPC 2.0 node endpoint (`DOGE_RPC_URL`)
//!   - `simulate`: dry-run ids derived from content, no network
//!   - `memory`: in-process recorder for tests and local tooling

pub mod credentials;
pub mod http;
pub mod info;
pub mod memory;
pub mod rpc;
pub mod service;
pub mod simulate;

use async_trait::async_trait;
use wcn_core::config::AnchorConfig;
use wcn_core::{Inscription, NotaryError, NotaryResult};

pub use credentials::AnchorCredentials;
pub use info::{inscription_info, InscriptionInfo};
pub use memory::MemoryProvider;
pub use rpc::RpcProvider;
pub use service::ServiceProvider;
pub use simulate::{SimulatedProvider, SIMULATION_PREFIX};

/// One inscription call
#[derive(Debug, Clone, Copy)]
pub struct InscriptionRequest<'a> {
    pub content: &'a [u8],
    pub mime_type: &'a str,
    pub label: &'a str,
}

/// An external service that durably inscribes bytes and returns an opaque id.
///
/// Implementations perform no retries of requests that reached the provider:
/// a repeated inscribe may create a second, orphaned inscription.
#[async_trait]
pub trait AnchorProvider: Send + Sync {
    /// Short binding name for logs (e.g. "rpc", "service", "simulated").
    fn name(&self) -> &str;

    /// Inscribe `request.content` and return the provider's receipt.
    ///
    /// # Errors
    /// - [`NotaryError::Anchor`] on transport failure, error responses, or a
    ///   response that carries no inscription id
    async fn inscribe(&self, request: &InscriptionRequest<'_>) -> NotaryResult<Inscription>;
}

/// Select the provider for a run.
///
/// Dry runs always get the simulator. Otherwise credentials must be complete
/// (wallet secret and an endpoint) and the REST service is preferred over
/// JSON-RPC when both are configured.
pub fn build_provider(
    credentials: &AnchorCredentials,
    cfg: &AnchorConfig,
    dry_run: bool,
) -> NotaryResult<Box<dyn AnchorProvider>> {
    if dry_run {
        return Ok(Box::new(SimulatedProvider));
    }

    credentials.validate(false)?;
    let client = http::HttpClient::new(cfg)?;

    if let Some(url) = credentials.service_url.as_deref() {
        warn_plaintext(url);
        return Ok(Box::new(ServiceProvider::new(client, url)));
    }
    if let Some(url) = credentials.rpc_url.as_deref() {
        warn_plaintext(url);
        return Ok(Box::new(RpcProvider::new(client, url)));
    }

    Err(NotaryError::Credentials(
        "no inscription path configured".into(),
    ))
}

fn warn_plaintext(url: &str) {
    let loopback = ["http://localhost", "http://127.0.0.1", "http://[::1]"];
    if url.starts_with("http://") && !loopback.iter().any(|p| url.starts_with(p)) {
        tracing::warn!(
            endpoint = %url,
            "anchor endpoint uses plaintext HTTP; document bytes are sent unencrypted in transit"
        );
    }
}
