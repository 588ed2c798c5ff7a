//! Per-chunk inscription state

use wcn_chunks::Chunk;
use wcn_core::Inscription;

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkState {
    Pending,
    Inscribed(Inscription),
}

/// A planned chunk and where it stands in the run.
///
/// Entries move `Pending -> Inscribed` exactly once, through
/// [`ChunkEntry::inscribed`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkEntry {
    pub chunk: Chunk,
    pub state: ChunkState,
}

impl ChunkEntry {
    pub fn pending(chunk: Chunk) -> Self {
        Self {
            chunk,
            state: ChunkState::Pending,
        }
    }

    /// Record the provider's receipt for this chunk.
    pub fn inscribed(self, inscription: Inscription) -> Self {
        Self {
            chunk: self.chunk,
            state: ChunkState::Inscribed(inscription),
        }
    }

    pub fn index(&self) -> usize {
        self.chunk.index
    }

    pub fn hash_hex(&self) -> String {
        self.chunk.hash_hex()
    }

    pub fn inscription(&self) -> Option<&Inscription> {
        match &self.state {
            ChunkState::Inscribed(insc) => Some(insc),
            ChunkState::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ChunkState::Pending)
    }
}
