//! wcn-chunks: SHA-256 content hashing and fixed-size chunking
//!
//! # Overview
//! - `sha256`: deterministic document/slice hashing (content identity)
//! - `split`: contiguous, index-ordered slices of at most `chunk_kb` KiB
//!
//! A chunk hash covers only its own bytes. The document hash covers the
//! whole working buffer, so a manifest carries a two-tier check: the
//! document hash for authenticity, chunk hashes for reassembly.

pub mod sha256;
pub mod split;

// Convenience re-exports for the most common operations
pub use sha256::{hash_bytes, hash_file, hash_hex, hash_reader, hash_to_hex, Digest};
pub use split::{split, Chunk};
