//! Fixed-size chunking
//!
//! Splits a working buffer into contiguous, non-overlapping slices of at most
//! `chunk_kb * 1024` bytes. Unlike content-defined chunking the boundaries are
//! purely positional: the same buffer and chunk size always yield the same
//! chunk list, and concatenating the chunks in index order reproduces the
//! buffer exactly.

use wcn_core::{NotaryError, NotaryResult};

use crate::sha256::{hash_bytes, Digest};

/// A single slice of the working buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position of this chunk
    pub index: usize,
    /// Byte offset within the working buffer
    pub offset: usize,
    /// Chunk length in bytes
    pub length: usize,
    /// SHA-256 of this chunk's bytes only
    pub hash: Digest,
}

impl Chunk {
    /// Describe `buffer` as a single chunk (used for inline inscriptions).
    pub fn whole(buffer: &[u8]) -> Self {
        Self {
            index: 0,
            offset: 0,
            length: buffer.len(),
            hash: hash_bytes(buffer),
        }
    }

    /// Borrow this chunk's bytes from the buffer it was cut from.
    pub fn bytes<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.offset..self.offset + self.length]
    }

    pub fn hash_hex(&self) -> String {
        crate::sha256::hash_to_hex(&self.hash)
    }
}

/// Split `buffer` into slices of at most `chunk_kb` KiB.
///
/// Returns an empty list for an empty buffer. A zero chunk size is a
/// configuration error.
pub fn split(buffer: &[u8], chunk_kb: u32) -> NotaryResult<Vec<Chunk>> {
    let chunk_size = chunk_kb as usize * 1024;
    if chunk_size == 0 {
        return Err(NotaryError::Config(
            "chunk size must be greater than zero".into(),
        ));
    }

    let chunks: Vec<Chunk> = buffer
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, slice)| Chunk {
            index,
            offset: index * chunk_size,
            length: slice.len(),
            hash: hash_bytes(slice),
        })
        .collect();

    tracing::debug!(
        bytes = buffer.len(),
        chunk_kb,
        chunks = chunks.len(),
        "split buffer"
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_buffer_yields_no_chunks() {
        assert!(split(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn zero_chunk_size_is_config_error() {
        let err = split(b"data", 0).unwrap_err();
        assert!(matches!(err, NotaryError::Config(_)));
    }

    #[test]
    fn exact_multiple_has_no_short_tail() {
        let data = vec![0x5Au8; 4 * 1024];
        let chunks = split(&data, 1).unwrap();
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.length == 1024));
    }

    #[test]
    fn final_chunk_may_be_shorter() {
        let data = vec![0x01u8; 2500];
        let chunks = split(&data, 1).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].length, 2500 - 2048);
        assert_eq!(chunks[2].offset, 2048);
    }

    #[test]
    fn chunk_hash_covers_only_its_bytes() {
        let data: Vec<u8> = (0u8..=255).cycle().take(3000).collect();
        let chunks = split(&data, 1).unwrap();
        for chunk in &chunks {
            assert_eq!(chunk.hash, hash_bytes(chunk.bytes(&data)));
        }
        assert_ne!(chunks[0].hash, hash_bytes(&data));
    }

    #[test]
    fn whole_chunk_spans_buffer() {
        let chunk = Chunk::whole(b"ten bytes!");
        assert_eq!(chunk.index, 0);
        assert_eq!(chunk.length, 10);
        assert_eq!(chunk.hash, hash_bytes(b"ten bytes!"));
    }

    proptest! {
        /// Concatenating chunks in index order reproduces the buffer
        #[test]
        fn chunks_reassemble_exactly(
            data in proptest::collection::vec(any::<u8>(), 0..=20_000),
            chunk_kb in 1u32..=8,
        ) {
            let chunks = split(&data, chunk_kb).unwrap();
            let mut joined = Vec::with_capacity(data.len());
            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.index, i);
                prop_assert!(chunk.length <= chunk_kb as usize * 1024);
                joined.extend_from_slice(chunk.bytes(&data));
            }
            prop_assert_eq!(joined, data);
        }

        #[test]
        fn chunking_is_deterministic(data in proptest::collection::vec(any::<u8>(), 0..=10_000)) {
            prop_assert_eq!(split(&data, 2).unwrap(), split(&data, 2).unwrap());
        }
    }
}
