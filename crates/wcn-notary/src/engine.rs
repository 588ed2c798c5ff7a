//! Notarization orchestrator: plan, then inscribe sequentially
//!
//! Full mode:    file (`<ns>-full`) -> attestation (`<ns>-attestation`)
//! Chunked mode: chunk 0..N-1 (`<ns>-chunk-<i>`) -> manifest (`<ns>-manifest`)
//!               -> attestation
//!
//! The first provider failure aborts the run. Inscriptions that already
//! completed stay on the ledger; their count is logged at warn.

use serde::Serialize;
use tracing::{info, warn};
use wcn_anchor::{build_provider, AnchorCredentials, AnchorProvider, InscriptionRequest};
use wcn_core::config::AnchorConfig;
use wcn_core::{Inscription, InscriptionMode, NotaryError, NotaryResult};

use crate::attestation::{build_attestation, Attestation};
use crate::entry::ChunkEntry;
use crate::manifest::{finalize_manifest, Manifest};
use crate::planner::{plan, PlanningOutcome};
use crate::request::NotaryConfig;

/// Progress callback: (inscriptions_done, inscriptions_total, message)
pub type ProgressFn = Box<dyn Fn(u64, u64, &str) + Send + Sync>;

const CHUNK_MIME: &str = "application/octet-stream";
const JSON_MIME: &str = "application/json";

/// Aggregate result of one notarization
#[derive(Debug, Clone)]
pub struct NotarizeResult {
    pub mode: InscriptionMode,
    pub doc_hash: String,
    pub file_inscription: Option<Inscription>,
    pub manifest_inscription: Option<Inscription>,
    pub attestation_inscription: Inscription,
    pub chunks: Vec<ChunkEntry>,
    pub attestation: Attestation,
    pub manifest: Option<Manifest>,
    pub timestamp: String,
    /// Name of the provider binding that anchored this run
    pub provider: String,
}

/// Serializable summary shared by the CLI and the daemon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotarizeSummary {
    pub mode: InscriptionMode,
    pub doc_hash: String,
    pub file_insc: Option<String>,
    pub manifest_insc: Option<String>,
    pub attestation_insc: String,
    pub chunks: Vec<ChunkSummary>,
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkSummary {
    pub i: usize,
    pub insc: Option<String>,
    pub hash: String,
}

impl NotarizeResult {
    pub fn summary(&self) -> NotarizeSummary {
        NotarizeSummary {
            mode: self.mode,
            doc_hash: self.doc_hash.clone(),
            file_insc: self
                .file_inscription
                .as_ref()
                .map(|i| i.inscription_id.clone()),
            manifest_insc: self
                .manifest_inscription
                .as_ref()
                .map(|i| i.inscription_id.clone()),
            attestation_insc: self.attestation_inscription.inscription_id.clone(),
            chunks: self
                .chunks
                .iter()
                .map(|c| ChunkSummary {
                    i: c.index(),
                    insc: c.inscription().map(|i| i.inscription_id.clone()),
                    hash: c.hash_hex(),
                })
                .collect(),
            ts: self.timestamp.clone(),
        }
    }

    /// Sum of the providers' cost estimates, when any were reported.
    pub fn total_cost(&self) -> Option<f64> {
        let costs: Vec<f64> = self
            .file_inscription
            .iter()
            .chain(self.manifest_inscription.iter())
            .chain(std::iter::once(&self.attestation_inscription))
            .chain(self.chunks.iter().filter_map(|c| c.inscription()))
            .filter_map(|i| i.cost_estimate)
            .collect();
        (!costs.is_empty()).then(|| costs.iter().sum())
    }

    pub fn inscription_count(&self) -> usize {
        let chunk_calls = match self.mode {
            InscriptionMode::Full => 0,
            InscriptionMode::Chunked => self.chunks.len(),
        };
        chunk_calls
            + usize::from(self.file_inscription.is_some())
            + usize::from(self.manifest_inscription.is_some())
            + 1
    }
}

/// Notarize `raw` with the provider selected from the environment and
/// `anchor` config (the simulator when `config.dry_run`).
///
/// Planning runs first, so configuration errors surface before credentials
/// are even looked at.
pub async fn notarize(
    config: &NotaryConfig,
    raw: &[u8],
    anchor: &AnchorConfig,
    progress: Option<&ProgressFn>,
) -> NotaryResult<NotarizeResult> {
    let planned = plan_blocking(config, raw).await?;
    let credentials = AnchorCredentials::resolve(anchor);
    let provider = build_provider(&credentials, anchor, config.dry_run)?;
    execute(provider.as_ref(), config, planned, progress).await
}

/// Notarize `raw` through an explicit provider.
pub async fn notarize_with(
    provider: &dyn AnchorProvider,
    config: &NotaryConfig,
    raw: &[u8],
    progress: Option<&ProgressFn>,
) -> NotaryResult<NotarizeResult> {
    let planned = plan_blocking(config, raw).await?;
    execute(provider, config, planned, progress).await
}

/// Hashing and Argon2id are CPU-bound; run them on the blocking pool so a
/// large or encrypted document does not stall the async workers.
async fn plan_blocking(config: &NotaryConfig, raw: &[u8]) -> NotaryResult<PlanningOutcome> {
    let config = config.clone();
    let raw = raw.to_vec();
    tokio::task::spawn_blocking(move || plan(&config, &raw))
        .await
        .map_err(|e| NotaryError::Other(anyhow::anyhow!("planning task failed: {e}")))?
}

/// Tracks completed calls so a failure can report what was left behind.
struct Run<'a> {
    provider: &'a dyn AnchorProvider,
    progress: Option<&'a ProgressFn>,
    done: u64,
    total: u64,
}

impl Run<'_> {
    async fn inscribe(
        &mut self,
        content: &[u8],
        mime_type: &str,
        label: &str,
    ) -> NotaryResult<Inscription> {
        let request = InscriptionRequest {
            content,
            mime_type,
            label,
        };
        match self.provider.inscribe(&request).await {
            Ok(insc) => {
                self.done += 1;
                info!(
                    label,
                    inscription = %insc.inscription_id,
                    bytes = content.len(),
                    provider = self.provider.name(),
                    "inscribed"
                );
                if let Some(cb) = self.progress {
                    cb(self.done, self.total, label);
                }
                Ok(insc)
            }
            Err(e) => {
                warn!(
                    label,
                    orphaned = self.done,
                    remaining = self.total - self.done,
                    error = %e,
                    "inscription failed, aborting; completed inscriptions are not rolled back"
                );
                Err(e)
            }
        }
    }
}

async fn execute(
    provider: &dyn AnchorProvider,
    config: &NotaryConfig,
    planned: PlanningOutcome,
    progress: Option<&ProgressFn>,
) -> NotaryResult<NotarizeResult> {
    let ns = &config.namespace;
    let mut run = Run {
        provider,
        progress,
        done: 0,
        total: planned.inscription_count() as u64,
    };

    let PlanningOutcome {
        mode,
        payload,
        doc_hash,
        chunks,
        manifest_template,
        ..
    } = planned;

    let mut file_inscription = None;
    let mut manifest_inscription = None;
    let mut manifest = None;

    let chunks = match (mode, manifest_template) {
        (InscriptionMode::Chunked, Some(template)) => {
            let mut inscribed = Vec::with_capacity(chunks.len());
            for entry in chunks {
                let label = format!("{ns}-chunk-{}", entry.index());
                let insc = run
                    .inscribe(entry.chunk.bytes(&payload), CHUNK_MIME, &label)
                    .await?;
                inscribed.push(entry.inscribed(insc));
            }

            let finalized = finalize_manifest(template, &inscribed)?;
            let bytes = finalized.to_bytes()?;
            let insc = run
                .inscribe(&bytes, JSON_MIME, &format!("{ns}-manifest"))
                .await?;
            manifest_inscription = Some(insc);
            manifest = Some(finalized);
            inscribed
        }
        _ => {
            let mut inscribed = Vec::with_capacity(1);
            for entry in chunks {
                let insc = run
                    .inscribe(&payload, config.mime_type(), &format!("{ns}-full"))
                    .await?;
                file_inscription = Some(insc.clone());
                inscribed.push(entry.inscribed(insc));
            }
            inscribed
        }
    };

    let attestation = build_attestation(
        config,
        &doc_hash,
        file_inscription.as_ref().map(|i| i.inscription_id.as_str()),
        manifest_inscription.as_ref().map(|i| i.inscription_id.as_str()),
    );
    let attestation_inscription = run
        .inscribe(
            &attestation.to_bytes()?,
            JSON_MIME,
            &format!("{ns}-attestation"),
        )
        .await?;

    info!(
        hash = %doc_hash,
        mode = %mode,
        inscriptions = run.done,
        attestation = %attestation_inscription.inscription_id,
        "notarization complete"
    );

    Ok(NotarizeResult {
        mode,
        doc_hash,
        file_inscription,
        manifest_inscription,
        attestation_inscription,
        chunks,
        attestation,
        manifest,
        timestamp: config.timestamp.clone(),
        provider: provider.name().to_string(),
    })
}
