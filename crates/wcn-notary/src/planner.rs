//! Pure planning step: no network, no filesystem
//!
//! Decides the working buffer (plaintext or `nonce || ciphertext || tag`),
//! its hash, the inscription mode and the chunk layout. Dry runs and the
//! real pipeline share this step unchanged.

use secrecy::ExposeSecret;
use tracing::{debug, info};
use wcn_chunks::{hash_bytes, hash_to_hex, split, Chunk};
use wcn_core::{InscriptionMode, NotaryError, NotaryResult, PrivacyMode};

use crate::entry::ChunkEntry;
use crate::manifest::{build_manifest, Manifest};
use crate::request::NotaryConfig;

/// Immutable result of [`plan`]
#[derive(Debug, Clone)]
pub struct PlanningOutcome {
    pub mode: InscriptionMode,
    /// The exact bytes that are hashed and anchored
    pub payload: Vec<u8>,
    pub doc_hash: String,
    pub chunks: Vec<ChunkEntry>,
    /// Chunked mode only
    pub manifest_template: Option<Manifest>,
    /// `privacy.recipient` for the manifest
    pub recipient: String,
}

impl PlanningOutcome {
    pub fn payload_len(&self) -> u64 {
        self.payload.len() as u64
    }

    /// Number of provider calls the orchestrator will make.
    pub fn inscription_count(&self) -> usize {
        match self.mode {
            InscriptionMode::Full => 2,
            InscriptionMode::Chunked => self.chunks.len() + 2,
        }
    }
}

/// Plan a notarization of `raw`.
///
/// # Errors
/// - [`NotaryError::Config`] for zero sizes, or encrypted mode without a
///   recipient key. Raised before any anchor call.
pub fn plan(config: &NotaryConfig, raw: &[u8]) -> NotaryResult<PlanningOutcome> {
    if config.max_inline_kb == 0 || config.chunk_kb == 0 {
        return Err(NotaryError::Config(format!(
            "max_inline_kb ({}) and chunk_kb ({}) must be greater than zero",
            config.max_inline_kb, config.chunk_kb
        )));
    }

    let (payload, recipient) = match config.privacy_mode {
        PrivacyMode::Public => (raw.to_vec(), "public".to_string()),
        PrivacyMode::Encrypted => {
            let passphrase = config
                .recipient_key
                .as_ref()
                .filter(|k| !k.expose_secret().is_empty())
                .ok_or_else(|| {
                    NotaryError::Config(
                        "encrypted privacy mode requires a recipient key".into(),
                    )
                })?;
            let (payload, key) = wcn_crypto::seal_payload(raw, passphrase, &config.kdf)?;
            (payload, wcn_crypto::key_fingerprint(&key))
        }
    };

    let doc_hash = hash_to_hex(&hash_bytes(&payload));
    let mode = if payload.len() <= config.max_inline_bytes() {
        InscriptionMode::Full
    } else {
        InscriptionMode::Chunked
    };

    let (chunks, manifest_template) = match mode {
        InscriptionMode::Full => (vec![ChunkEntry::pending(Chunk::whole(&payload))], None),
        InscriptionMode::Chunked => {
            let chunks: Vec<ChunkEntry> = split(&payload, config.chunk_kb)?
                .into_iter()
                .map(ChunkEntry::pending)
                .collect();
            let template = build_manifest(
                config,
                &doc_hash,
                payload.len() as u64,
                &chunks,
                &recipient,
            );
            (chunks, Some(template))
        }
    };

    info!(
        hash = %doc_hash,
        mode = %mode,
        bytes = payload.len(),
        chunks = chunks.len(),
        privacy = config.privacy_mode.as_str(),
        "planned notarization"
    );
    debug!(threshold = config.max_inline_bytes(), chunk_kb = config.chunk_kb, "plan sizes");

    Ok(PlanningOutcome {
        mode,
        payload,
        doc_hash,
        chunks,
        manifest_template,
        recipient,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use secrecy::SecretString;
    use wcn_crypto::KdfParams;

    fn fast_kdf() -> KdfParams {
        KdfParams {
            mem_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    fn config(max_inline_kb: u32, chunk_kb: u32) -> NotaryConfig {
        NotaryConfig {
            title: "Doc A".into(),
            max_inline_kb,
            chunk_kb,
            kdf: fast_kdf(),
            ..Default::default()
        }
    }

    #[test]
    fn small_public_document_is_full() {
        let raw = b"0123456789";
        let out = plan(&config(256, 512), raw).unwrap();

        assert_eq!(out.mode, InscriptionMode::Full);
        assert_eq!(out.chunks.len(), 1);
        assert_eq!(out.chunks[0].hash_hex(), out.doc_hash);
        assert_eq!(out.payload, raw);
        assert!(out.manifest_template.is_none());
        assert_eq!(out.recipient, "public");
        assert_eq!(out.inscription_count(), 2);
    }

    #[test]
    fn large_document_is_chunked() {
        let raw = vec![0x5Au8; 2_097_152];
        let out = plan(&config(256, 512), &raw).unwrap();

        assert_eq!(out.mode, InscriptionMode::Chunked);
        assert_eq!(out.chunks.len(), 4);
        let manifest = out.manifest_template.as_ref().unwrap();
        assert_eq!(manifest.doc.bytes, 2_097_152);
        assert_eq!(manifest.chunks.len(), 4);
        assert_eq!(manifest.doc.doc_hash, out.doc_hash);
        assert_eq!(out.inscription_count(), 6);
    }

    #[test]
    fn threshold_boundary() {
        let at = vec![1u8; 4 * 1024];
        assert_eq!(plan(&config(4, 1), &at).unwrap().mode, InscriptionMode::Full);

        let over = vec![1u8; 4 * 1024 + 1];
        let out = plan(&config(4, 1), &over).unwrap();
        assert_eq!(out.mode, InscriptionMode::Chunked);
        assert_eq!(out.chunks.len(), 5);
        assert_eq!(out.chunks[4].chunk.length, 1);
    }

    #[test]
    fn empty_document_is_one_empty_chunk() {
        let out = plan(&config(256, 512), b"").unwrap();
        assert_eq!(out.mode, InscriptionMode::Full);
        assert_eq!(out.chunks.len(), 1);
        assert_eq!(out.chunks[0].chunk.length, 0);
        assert_eq!(
            out.doc_hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn zero_sizes_are_config_errors() {
        assert!(matches!(
            plan(&config(0, 512), b"x"),
            Err(NotaryError::Config(_))
        ));
        assert!(matches!(
            plan(&config(256, 0), b"x"),
            Err(NotaryError::Config(_))
        ));
    }

    #[test]
    fn encrypted_without_key_is_config_error() {
        let cfg = NotaryConfig {
            privacy_mode: PrivacyMode::Encrypted,
            ..config(256, 512)
        };
        assert!(matches!(plan(&cfg, b"secret"), Err(NotaryError::Config(_))));

        let empty_key = NotaryConfig {
            recipient_key: Some(SecretString::from("")),
            ..cfg
        };
        assert!(matches!(
            plan(&empty_key, b"secret"),
            Err(NotaryError::Config(_))
        ));
    }

    #[test]
    fn encrypted_payload_hashes_ciphertext() {
        let cfg = NotaryConfig {
            privacy_mode: PrivacyMode::Encrypted,
            recipient_key: Some(SecretString::from("hunter2")),
            ..config(256, 512)
        };
        let raw = b"confidential terms";
        let out = plan(&cfg, raw).unwrap();

        assert_eq!(out.payload.len(), 24 + raw.len() + 16);
        assert_eq!(out.doc_hash, wcn_chunks::hash_hex(&out.payload));
        assert_ne!(out.doc_hash, wcn_chunks::hash_hex(raw));
        assert!(out.recipient.starts_with("key:"));
        assert!(!out.recipient.contains("hunter2"));

        let opened =
            wcn_crypto::open_payload(&out.payload, cfg.recipient_key.as_ref().unwrap(), &cfg.kdf)
                .unwrap();
        assert_eq!(opened, raw);
    }

    proptest! {
        #[test]
        fn public_plan_is_idempotent(data in proptest::collection::vec(any::<u8>(), 0..8192)) {
            let cfg = config(2, 1);
            let a = plan(&cfg, &data).unwrap();
            let b = plan(&cfg, &data).unwrap();

            prop_assert_eq!(&a.doc_hash, &b.doc_hash);
            prop_assert_eq!(a.mode, b.mode);
            let ha: Vec<String> = a.chunks.iter().map(|c| c.hash_hex()).collect();
            let hb: Vec<String> = b.chunks.iter().map(|c| c.hash_hex()).collect();
            prop_assert_eq!(ha, hb);
        }

        #[test]
        fn chunks_cover_payload(data in proptest::collection::vec(any::<u8>(), 1..8192)) {
            let out = plan(&config(1, 1), &data).unwrap();
            let total: usize = out.chunks.iter().map(|c| c.chunk.length).sum();
            prop_assert_eq!(total, data.len());
            if let Some(m) = &out.manifest_template {
                prop_assert!(m.check_consistency().is_ok());
            }
        }
    }
}
