//! Verification against an attestation (and manifest, for chunked documents)
//!
//! A hash mismatch is a result (`verified: false` with a reason), never an
//! error. Only loading the candidate document can fail.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};
use wcn_chunks::{hash_file, hash_hex, hash_to_hex};
use wcn_core::{InscriptionMode, NotaryError, NotaryResult};

use crate::attestation::Attestation;
use crate::loader;
use crate::manifest::Manifest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    pub mode: InscriptionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,
    pub attestation: Attestation,
}

/// Hash `source` (path or URL) and verify it.
///
/// Local files are streamed through the hasher on the blocking pool rather
/// than read into memory.
pub async fn verify_document(
    source: &str,
    attestation: &Attestation,
    manifest: Option<&Manifest>,
) -> NotaryResult<VerificationResult> {
    let doc_hash = if loader::is_remote(source) {
        hash_hex(&loader::load(source).await?.bytes)
    } else {
        let path = PathBuf::from(source);
        let digest = tokio::task::spawn_blocking(move || hash_file(&path))
            .await
            .map_err(|e| NotaryError::Other(anyhow::anyhow!("hashing task failed: {e}")))??;
        hash_to_hex(&digest)
    };

    let result = verify_digest(&doc_hash, attestation, manifest);
    if result.verified {
        info!(source = %source, hash = %attestation.doc_hash, "document verified");
    } else {
        warn!(
            source = %source,
            reason = result.reason.as_deref().unwrap_or_default(),
            "document failed verification"
        );
    }
    Ok(result)
}

/// Compare `sha256(bytes)` with `manifest.doc.doc_hash` when a manifest is
/// given, otherwise with `attestation.doc_hash`.
pub fn verify_bytes(
    bytes: &[u8],
    attestation: &Attestation,
    manifest: Option<&Manifest>,
) -> VerificationResult {
    verify_digest(&hash_hex(bytes), attestation, manifest)
}

fn verify_digest(
    doc_hash: &str,
    attestation: &Attestation,
    manifest: Option<&Manifest>,
) -> VerificationResult {
    let (mode, expected, against) = match manifest {
        Some(m) => (InscriptionMode::Chunked, m.doc.doc_hash.as_str(), "manifest"),
        None => (InscriptionMode::Full, attestation.doc_hash.as_str(), "attestation"),
    };

    let reason = if manifest.is_some_and(|m| m.doc.doc_hash != attestation.doc_hash) {
        Some("manifest does not match attestation".to_string())
    } else if expected != doc_hash {
        Some(format!("document hash mismatch against {against}"))
    } else {
        None
    };

    VerificationResult {
        verified: reason.is_none(),
        mode,
        reason,
        manifest: manifest.cloned(),
        attestation: attestation.clone(),
    }
}

/// Rebuild the working buffer from chunk payloads in index order.
///
/// Every chunk must match its manifest entry's byte count and hash, and the
/// concatenation must hash to `doc.doc_hash`.
///
/// # Errors
/// - [`NotaryError::Integrity`] on any count, size or hash mismatch
pub fn reassemble(manifest: &Manifest, chunk_payloads: &[Vec<u8>]) -> NotaryResult<Vec<u8>> {
    manifest.check_consistency()?;

    if chunk_payloads.len() != manifest.chunks.len() {
        return Err(NotaryError::Integrity(format!(
            "expected {} chunks, got {}",
            manifest.chunks.len(),
            chunk_payloads.len()
        )));
    }

    // Declared sizes are untrusted; only allocate once every payload agrees.
    for (entry, payload) in manifest.chunks.iter().zip(chunk_payloads) {
        if payload.len() as u64 != entry.bytes {
            return Err(NotaryError::Integrity(format!(
                "chunk {}: expected {} bytes, got {}",
                entry.i,
                entry.bytes,
                payload.len()
            )));
        }
    }

    let mut buffer = Vec::with_capacity(chunk_payloads.iter().map(Vec::len).sum());
    for (entry, payload) in manifest.chunks.iter().zip(chunk_payloads) {
        let actual = hash_hex(payload);
        if actual != entry.hash {
            return Err(NotaryError::Integrity(format!(
                "chunk {}: hash mismatch (expected {}, got {actual})",
                entry.i, entry.hash
            )));
        }
        buffer.extend_from_slice(payload);
    }

    let doc_hash = hash_hex(&buffer);
    if doc_hash != manifest.doc.doc_hash {
        return Err(NotaryError::Integrity(format!(
            "reassembled document hash {doc_hash} does not match manifest {}",
            manifest.doc.doc_hash
        )));
    }

    Ok(buffer)
}
