//! wcn-crypto: optional payload encryption for notarized documents
//!
//! Construction: XChaCha20-Poly1305 built from its parts
//!
//! ```text
//! passphrase ──Argon2id(salt = "wcn-salt")──▶ document key (256-bit)
//! document key + nonce[0..16] ──HChaCha20──▶ subkey (256-bit)
//! inner nonce = 0x00000000 || nonce[16..24]
//! ChaCha20-Poly1305(subkey, inner nonce) ──▶ ciphertext || tag
//! ```
//!
//! Working-buffer layout: `[24-byte nonce][ciphertext][16-byte tag]`, no
//! length prefixes.

pub mod aead;
pub mod hchacha;
pub mod kdf;

pub use aead::{decrypt, encrypt, open, open_payload, seal, seal_payload, Encrypted};
pub use hchacha::{derive_subkey, hchacha20};
pub use kdf::{derive_document_key, key_fingerprint, DocumentKey, KdfParams, FIXED_SALT};

/// Size of a document key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of the ChaCha20-Poly1305 nonce used after subkey derivation
pub const INNER_NONCE_SIZE: usize = 12;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Cipher label recorded in manifests
pub const CIPHER_NAME: &str = "xchacha20poly1305";
