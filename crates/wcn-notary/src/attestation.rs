//! Attestation payload, anchored for every document

use serde::{Deserialize, Serialize};
use wcn_core::NotaryResult;

use crate::request::NotaryConfig;
use crate::HASH_ALGO;

/// `{p, op:"attest", title, algo, doc_hash, file_insc?, manifest_insc?, author, ts}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    /// Namespace
    pub p: String,
    pub op: String,
    pub title: String,
    pub algo: String,
    pub doc_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_insc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_insc: Option<String>,
    pub author: String,
    pub ts: String,
}

pub fn build_attestation(
    config: &NotaryConfig,
    doc_hash: &str,
    file_insc: Option<&str>,
    manifest_insc: Option<&str>,
) -> Attestation {
    Attestation {
        p: config.namespace.clone(),
        op: "attest".to_string(),
        title: config.title.clone(),
        algo: HASH_ALGO.to_string(),
        doc_hash: doc_hash.to_string(),
        file_insc: file_insc.map(str::to_string),
        manifest_insc: manifest_insc.map(str::to_string),
        author: config.author.clone(),
        ts: config.timestamp.clone(),
    }
}

impl Attestation {
    /// Compact JSON, the exact bytes that get inscribed.
    pub fn to_bytes(&self) -> NotaryResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> NotaryResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}
