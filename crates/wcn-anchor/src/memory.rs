//! In-process provider that records every inscription
//!
//! Used by tests and by offline tooling that wants to inspect exactly what
//! would have been anchored. Can be told to fail on the Nth call.

use async_trait::async_trait;
use std::sync::Mutex;
use wcn_core::{Inscription, NotaryError, NotaryResult};

use crate::{AnchorProvider, InscriptionRequest};

/// A recorded inscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredInscription {
    pub inscription_id: String,
    pub label: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MemoryProvider {
    records: Mutex<Vec<StoredInscription>>,
    /// Zero-based call number that fails with an anchor error
    fail_at: Option<usize>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose `n`th call (zero-based) fails.
    pub fn failing_at(n: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_at: Some(n),
        }
    }

    /// Snapshot of everything inscribed so far, in call order.
    pub fn records(&self) -> Vec<StoredInscription> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AnchorProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn inscribe(&self, request: &InscriptionRequest<'_>) -> NotaryResult<Inscription> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let n = records.len();

        if self.fail_at == Some(n) {
            return Err(NotaryError::Anchor(format!(
                "memory provider: injected failure on call {n} ({})",
                request.label
            )));
        }

        let hash = wcn_chunks::hash_hex(request.content);
        let inscription_id = format!("mem{n}-{}i0", &hash[..16]);
        records.push(StoredInscription {
            inscription_id: inscription_id.clone(),
            label: request.label.to_string(),
            mime_type: request.mime_type.to_string(),
            content: request.content.to_vec(),
        });

        Ok(Inscription::new(inscription_id))
    }
}
