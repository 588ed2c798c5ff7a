//! Local inscription info (no live ledger lookup)

use serde::{Deserialize, Serialize};

use crate::SIMULATION_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InscriptionInfo {
    pub inscription_id: String,
    pub status: String,
    pub note: String,
}

pub fn inscription_info(inscription_id: &str) -> InscriptionInfo {
    if inscription_id.starts_with(SIMULATION_PREFIX) {
        return InscriptionInfo {
            inscription_id: inscription_id.to_string(),
            status: "simulated".into(),
            note: "Produced by a dry run; nothing was anchored.".into(),
        };
    }

    InscriptionInfo {
        inscription_id: inscription_id.to_string(),
        status: "unverified-local".into(),
        note: "Use DOGE_RPC_URL or INSCRIBE_SERVICE_URL to fetch live details.".into(),
    }
}
