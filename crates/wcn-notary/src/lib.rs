//! wcn-notary: the notarization engine
//!
//! Pipeline:
//! ```text
//! raw bytes ─▶ planner (encrypt? hash, full|chunked, manifest template)   pure
//!           ─▶ engine  (inscribe file|chunks, manifest, attestation)      anchor I/O
//! candidate ─▶ verify  (sha256 vs manifest.doc.doc_hash | attestation)    pure + loader
//! ```
//!
//! The document hash always covers the working buffer: the plaintext in
//! public mode, `nonce || ciphertext || tag` in encrypted mode.

pub mod attestation;
pub mod engine;
pub mod entry;
pub mod loader;
pub mod manifest;
pub mod planner;
pub mod request;
pub mod verify;

pub use attestation::{build_attestation, Attestation};
pub use engine::{notarize, notarize_with, NotarizeResult, NotarizeSummary, ProgressFn};
pub use entry::{ChunkEntry, ChunkState};
pub use loader::{load, load_with_timeout};
pub use manifest::{build_manifest, finalize_manifest, Manifest};
pub use planner::{plan, PlanningOutcome};
pub use request::NotaryConfig;
pub use verify::{reassemble, verify_bytes, verify_document, VerificationResult};

/// Digest algorithm recorded in manifests and attestations
pub const HASH_ALGO: &str = "sha256";
