//! SHA-256 content hashing for documents and byte slices
//!
//! The hex digest is the `doc_hash` carried by manifests and attestations,
//! so the output format (64 lowercase hex chars) is part of the wire format.

use sha2::{Digest as _, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use wcn_core::{NotaryError, NotaryResult};

const READ_BUF: usize = 64 * 1024;

/// A SHA-256 digest (32 bytes)
pub type Digest = [u8; 32];

/// Hash a byte slice in memory.
pub fn hash_bytes(data: &[u8]) -> Digest {
    Sha256::digest(data).into()
}

/// Hash a byte slice and format it as lowercase hex.
pub fn hash_hex(data: &[u8]) -> String {
    hash_to_hex(&hash_bytes(data))
}

/// Hash everything `reader` yields without buffering it whole.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<Digest> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hasher.finalize().into())
}

/// Hash a file on disk, streaming it through 64 KiB reads.
///
/// # Errors
/// - [`NotaryError::NotFound`] when the path does not exist
/// - [`NotaryError::Io`] for any other read failure
pub fn hash_file(path: &Path) -> NotaryResult<Digest> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            NotaryError::NotFound(format!("{}: no such file", path.display()))
        }
        _ => NotaryError::Io(e),
    })?;
    Ok(hash_reader(BufReader::with_capacity(READ_BUF, file))?)
}

/// Format a digest as lowercase hex string (64 chars)
pub fn hash_to_hex(hash: &Digest) -> String {
    hex::encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_hash_is_known() {
        assert_eq!(
            hash_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn abc_hash_is_known() {
        assert_eq!(
            hash_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn file_hash_matches_in_memory_hash() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0u32..200_000).map(|i| (i % 251) as u8).collect();
        std::fs::write(tmp.path(), &data).unwrap();

        let digest = hash_file(tmp.path()).unwrap();
        assert_eq!(digest, hash_bytes(&data));
        assert_eq!(hash_to_hex(&digest).len(), 64);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = hash_file(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, NotaryError::NotFound(_)));
    }

    proptest! {
        #[test]
        fn reader_hash_matches_slice_hash(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
            prop_assert_eq!(hash_reader(data.as_slice()).unwrap(), hash_bytes(&data));
        }

        #[test]
        fn single_bit_flip_changes_hash(
            data in proptest::collection::vec(any::<u8>(), 1..=2048),
            pos in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut mutated = data.clone();
            let i = pos.index(mutated.len());
            mutated[i] ^= 1 << bit;
            prop_assert_ne!(hash_bytes(&data), hash_bytes(&mutated));
        }
    }
}
