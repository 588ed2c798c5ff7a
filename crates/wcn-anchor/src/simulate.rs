//! Dry-run provider: deterministic fake inscription ids, no network

use async_trait::async_trait;
use wcn_core::{Inscription, NotaryResult};

use crate::{AnchorProvider, InscriptionRequest};

/// Every simulated inscription id starts with this marker.
pub const SIMULATION_PREFIX: &str = "sim-";

/// Returns `sim-<label>-<first 32 hex chars of sha256(content)>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProvider;

impl SimulatedProvider {
    pub fn simulated_id(label: &str, content: &[u8]) -> String {
        let hash = wcn_chunks::hash_hex(content);
        format!("{SIMULATION_PREFIX}{label}-{}", &hash[..32])
    }
}

#[async_trait]
impl AnchorProvider for SimulatedProvider {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn inscribe(&self, request: &InscriptionRequest<'_>) -> NotaryResult<Inscription> {
        let id = Self::simulated_id(request.label, request.content);
        tracing::debug!(label = request.label, inscription = %id, "simulated inscription");
        Ok(Inscription {
            inscription_id: id,
            txid: None,
            cost_estimate: Some(0.0),
        })
    }
}
