//! Chunk manifest (`wcn: "ins-1"`)
//!
//! Produced only in chunked mode. The planner builds a template whose chunk
//! entries carry the `"pending"` placeholder; the orchestrator finalizes it
//! once every chunk has been inscribed and anchors the pretty-printed JSON.

use serde::{Deserialize, Serialize};
use wcn_core::{NotaryError, NotaryResult, PrivacyMode, BRAND_NOTES};

use crate::entry::ChunkEntry;
use crate::request::NotaryConfig;
use crate::HASH_ALGO;

/// Manifest format identifier
pub const MANIFEST_VERSION: &str = "ins-1";

/// Inscription id placeholder for chunks not yet anchored
pub const PENDING_INSCRIPTION: &str = "pending";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub wcn: String,
    pub doc: ManifestDoc,
    pub privacy: ManifestPrivacy,
    pub chunks: Vec<ManifestChunk>,
    pub created_at: String,
    pub author: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestDoc {
    pub title: String,
    pub mime: String,
    pub algo: String,
    /// SHA-256 of the whole working buffer
    pub doc_hash: String,
    /// Working buffer length
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestPrivacy {
    pub mode: PrivacyMode,
    /// `"xchacha20poly1305"` when encrypted, `null` otherwise
    pub cipher: Option<String>,
    /// `"public"` or a key fingerprint
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestChunk {
    pub i: usize,
    pub bytes: u64,
    pub hash: String,
    pub insc: String,
}

impl ManifestChunk {
    fn from_entry(entry: &ChunkEntry) -> Self {
        Self {
            i: entry.index(),
            bytes: entry.chunk.length as u64,
            hash: entry.hash_hex(),
            insc: entry
                .inscription()
                .map(|insc| insc.inscription_id.clone())
                .unwrap_or_else(|| PENDING_INSCRIPTION.to_string()),
        }
    }
}

/// Build a manifest from the request and the current chunk states.
///
/// `recipient` is written verbatim into `privacy.recipient`.
pub fn build_manifest(
    config: &NotaryConfig,
    doc_hash: &str,
    doc_bytes: u64,
    chunks: &[ChunkEntry],
    recipient: &str,
) -> Manifest {
    let cipher = match config.privacy_mode {
        PrivacyMode::Encrypted => Some(wcn_crypto::CIPHER_NAME.to_string()),
        PrivacyMode::Public => None,
    };

    let mut entries: Vec<ManifestChunk> = chunks.iter().map(ManifestChunk::from_entry).collect();
    entries.sort_by_key(|c| c.i);

    Manifest {
        wcn: MANIFEST_VERSION.to_string(),
        doc: ManifestDoc {
            title: config.title.clone(),
            mime: config.mime_type().to_string(),
            algo: HASH_ALGO.to_string(),
            doc_hash: doc_hash.to_string(),
            bytes: doc_bytes,
        },
        privacy: ManifestPrivacy {
            mode: config.privacy_mode,
            cipher,
            recipient: recipient.to_string(),
        },
        chunks: entries,
        created_at: config.timestamp.clone(),
        author: config.author.clone(),
        notes: BRAND_NOTES.to_string(),
    }
}

/// Replace the template's chunk entries with the inscribed ones.
///
/// Fails if any chunk is still pending. Entries are stable-sorted by index,
/// independent of the order the inscriptions completed in.
pub fn finalize_manifest(template: Manifest, chunks: &[ChunkEntry]) -> NotaryResult<Manifest> {
    if let Some(pending) = chunks.iter().find(|c| c.is_pending()) {
        return Err(anyhow::anyhow!(
            "cannot finalize manifest: chunk {} has no inscription",
            pending.index()
        )
        .into());
    }

    let mut entries: Vec<ManifestChunk> = chunks.iter().map(ManifestChunk::from_entry).collect();
    entries.sort_by_key(|c| c.i);

    let manifest = Manifest {
        chunks: entries,
        ..template
    };
    manifest.check_consistency()?;
    Ok(manifest)
}

impl Manifest {
    /// Pretty-printed JSON, the exact bytes that get inscribed.
    pub fn to_bytes(&self) -> NotaryResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> NotaryResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Sum of the declared chunk sizes, `None` if it overflows `u64`.
    pub fn total_chunk_bytes(&self) -> Option<u64> {
        self.chunks
            .iter()
            .try_fold(0u64, |acc, c| acc.checked_add(c.bytes))
    }

    pub fn is_pending(&self) -> bool {
        self.chunks.iter().any(|c| c.insc == PENDING_INSCRIPTION)
    }

    /// Structural checks: chunk indices run 0..N-1 and the chunk byte counts
    /// sum to `doc.bytes`.
    pub fn check_consistency(&self) -> NotaryResult<()> {
        for (expected, chunk) in self.chunks.iter().enumerate() {
            if chunk.i != expected {
                return Err(NotaryError::Integrity(format!(
                    "manifest chunk at position {expected} has index {}",
                    chunk.i
                )));
            }
        }

        let total = self.total_chunk_bytes().ok_or_else(|| {
            NotaryError::Integrity("manifest chunk sizes overflow u64".into())
        })?;
        if total != self.doc.bytes {
            return Err(NotaryError::Integrity(format!(
                "manifest chunks sum to {total} bytes, document is {}",
                self.doc.bytes
            )));
        }
        Ok(())
    }
}
