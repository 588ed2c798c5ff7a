//! Key derivation: Argon2id passphrase → document key
//!
//! The salt is a fixed, published constant shared by every document. Secrecy
//! of the key rests entirely on passphrase entropy.

use argon2::{Algorithm, Argon2, Params, Version};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use wcn_core::config::CryptoConfig;
use wcn_core::{NotaryError, NotaryResult};
use zeroize::Zeroize;

use crate::KEY_SIZE;

/// Salt used for every passphrase derivation.
pub const FIXED_SALT: &[u8] = b"wcn-salt";

/// A 256-bit key derived from a passphrase via Argon2id.
///
/// Zeroized on drop. Never persisted or anchored.
#[derive(Clone)]
pub struct DocumentKey {
    bytes: [u8; KEY_SIZE],
}

impl DocumentKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DocumentKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Argon2id parameters for KDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub mem_cost_kib: u32,
    /// Time cost / iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            mem_cost_kib: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl From<&CryptoConfig> for KdfParams {
    fn from(cfg: &CryptoConfig) -> Self {
        Self {
            mem_cost_kib: cfg.argon2_mem_cost_kib,
            time_cost: cfg.argon2_time_cost,
            parallelism: cfg.argon2_parallelism,
        }
    }
}

/// Derive the document key from a passphrase using the fixed salt.
pub fn derive_document_key(
    passphrase: &SecretString,
    params: &KdfParams,
) -> NotaryResult<DocumentKey> {
    derive_key_with_salt(passphrase, FIXED_SALT, params)
}

/// Derive a 256-bit key from a passphrase and an explicit salt (>= 8 bytes).
pub fn derive_key_with_salt(
    passphrase: &SecretString,
    salt: &[u8],
    params: &KdfParams,
) -> NotaryResult<DocumentKey> {
    let argon2_params = Params::new(
        params.mem_cost_kib,
        params.time_cost,
        params.parallelism,
        Some(KEY_SIZE),
    )
    .map_err(|e| NotaryError::Config(format!("invalid Argon2id params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; KEY_SIZE];
    argon2
        .hash_password_into(passphrase.expose_secret().as_bytes(), salt, &mut key)
        .map_err(|e| anyhow::anyhow!("Argon2id KDF failed: {e}"))?;

    Ok(DocumentKey::from_bytes(key))
}

/// Public, non-reversible label for a document key: `key:` + the first
/// 8 bytes of SHA-256(key) in hex. Guessing a passphrase against it costs a
/// full Argon2id derivation.
pub fn key_fingerprint(key: &DocumentKey) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("key:{}", hex::encode(&digest[..8]))
}

#[cfg(test)]
pub(crate) fn fast_params() -> KdfParams {
    KdfParams {
        mem_cost_kib: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}
