//! XChaCha20-Poly1305 composed from HChaCha20 and ChaCha20-Poly1305
//!
//! Encrypted payload format (binary):
//! ```text
//! [24 bytes: random nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! ```
//!
//! Decryption never returns plaintext whose tag failed to verify.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::RngCore;
use secrecy::SecretString;
use wcn_core::{NotaryError, NotaryResult};

use crate::hchacha::derive_subkey;
use crate::kdf::{derive_document_key, DocumentKey, KdfParams};
use crate::{NONCE_SIZE, TAG_SIZE};

/// Output of [`encrypt`]: the random nonce, `ciphertext || tag`, and the key
/// that was derived for this request.
#[derive(Debug)]
pub struct Encrypted {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
    pub key: DocumentKey,
}

impl Encrypted {
    /// Lay out the working buffer: `nonce || ciphertext || tag`.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        payload.extend_from_slice(&self.nonce);
        payload.extend_from_slice(&self.ciphertext);
        payload
    }
}

/// Encrypt `plaintext` under `key` with an explicit 24-byte nonce.
///
/// Returns `ciphertext || tag`.
pub fn seal(
    key: &DocumentKey,
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> NotaryResult<Vec<u8>> {
    let (subkey, inner_nonce) = derive_subkey(key.as_bytes(), nonce);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(subkey.as_slice()));

    cipher
        .encrypt(Nonce::from_slice(&inner_nonce), plaintext)
        .map_err(|e| anyhow::anyhow!("payload encryption failed: {e}").into())
}

/// Decrypt `ciphertext || tag` under `key`.
///
/// Fails with [`NotaryError::Authentication`] if the tag does not verify.
pub fn open(
    key: &DocumentKey,
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> NotaryResult<Vec<u8>> {
    if ciphertext.len() < TAG_SIZE {
        return Err(NotaryError::Authentication(format!(
            "ciphertext too short: {} bytes (minimum {TAG_SIZE})",
            ciphertext.len()
        )));
    }

    let (subkey, inner_nonce) = derive_subkey(key.as_bytes(), nonce);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(subkey.as_slice()));

    cipher
        .decrypt(Nonce::from_slice(&inner_nonce), ciphertext)
        .map_err(|_| {
            NotaryError::Authentication(
                "tag mismatch: wrong passphrase or corrupted ciphertext".into(),
            )
        })
}

/// Derive the document key from `passphrase` and encrypt under a fresh
/// random nonce.
pub fn encrypt(
    plaintext: &[u8],
    passphrase: &SecretString,
    params: &KdfParams,
) -> NotaryResult<Encrypted> {
    let key = derive_document_key(passphrase, params)?;

    let mut nonce = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = seal(&key, &nonce, plaintext)?;
    tracing::debug!(
        plaintext_bytes = plaintext.len(),
        ciphertext_bytes = ciphertext.len(),
        "payload encrypted"
    );

    Ok(Encrypted {
        nonce,
        ciphertext,
        key,
    })
}

/// Derive the document key from `passphrase` and decrypt `ciphertext || tag`.
pub fn decrypt(
    ciphertext: &[u8],
    nonce: &[u8; NONCE_SIZE],
    passphrase: &SecretString,
    params: &KdfParams,
) -> NotaryResult<Vec<u8>> {
    let key = derive_document_key(passphrase, params)?;
    open(&key, nonce, ciphertext)
}

/// Encrypt straight into the working-buffer layout.
///
/// Returns the buffer and the derived key (for fingerprinting).
pub fn seal_payload(
    plaintext: &[u8],
    passphrase: &SecretString,
    params: &KdfParams,
) -> NotaryResult<(Vec<u8>, DocumentKey)> {
    let enc = encrypt(plaintext, passphrase, params)?;
    let payload = enc.to_payload();
    Ok((payload, enc.key))
}

/// Decrypt a working buffer laid out as `nonce || ciphertext || tag`.
pub fn open_payload(
    payload: &[u8],
    passphrase: &SecretString,
    params: &KdfParams,
) -> NotaryResult<Vec<u8>> {
    if payload.len() < NONCE_SIZE + TAG_SIZE {
        return Err(NotaryError::Authentication(format!(
            "encrypted payload too short: {} bytes (minimum {})",
            payload.len(),
            NONCE_SIZE + TAG_SIZE
        )));
    }

    let (nonce_bytes, ciphertext) = payload.split_at(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(nonce_bytes);
    decrypt(ciphertext, &nonce, passphrase, params)
}
