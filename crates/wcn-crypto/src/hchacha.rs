//! HChaCha20 subkey derivation
//!
//! Runs the ChaCha20 permutation over (constant, key, nonce[0..16]) and keeps
//! the first and last rows of the state. There is no feed-forward addition of
//! the input state, which is what separates HChaCha20 from a ChaCha20 block.

use zeroize::{Zeroize, Zeroizing};

use crate::{INNER_NONCE_SIZE, KEY_SIZE, NONCE_SIZE};

/// "expand 32-byte k"
const SIGMA: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

#[inline(always)]
fn quarter_round(s: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    s[a] = s[a].wrapping_add(s[b]);
    s[d] = (s[d] ^ s[a]).rotate_left(16);
    s[c] = s[c].wrapping_add(s[d]);
    s[b] = (s[b] ^ s[c]).rotate_left(12);
    s[a] = s[a].wrapping_add(s[b]);
    s[d] = (s[d] ^ s[a]).rotate_left(8);
    s[c] = s[c].wrapping_add(s[d]);
    s[b] = (s[b] ^ s[c]).rotate_left(7);
}

/// One column round followed by one diagonal round.
fn double_round(s: &mut [u32; 16]) {
    quarter_round(s, 0, 4, 8, 12);
    quarter_round(s, 1, 5, 9, 13);
    quarter_round(s, 2, 6, 10, 14);
    quarter_round(s, 3, 7, 11, 15);

    quarter_round(s, 0, 5, 10, 15);
    quarter_round(s, 1, 6, 11, 12);
    quarter_round(s, 2, 7, 8, 13);
    quarter_round(s, 3, 4, 9, 14);
}

fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Derive a 256-bit subkey from `key` and a 128-bit nonce.
pub fn hchacha20(key: &[u8; KEY_SIZE], nonce: &[u8; 16]) -> [u8; KEY_SIZE] {
    let mut state = [0u32; 16];
    state[..4].copy_from_slice(&SIGMA);
    for (i, word) in key.chunks_exact(4).enumerate() {
        state[4 + i] = read_u32_le(word);
    }
    for (i, word) in nonce.chunks_exact(4).enumerate() {
        state[12 + i] = read_u32_le(word);
    }

    for _ in 0..10 {
        double_round(&mut state);
    }

    let mut out = [0u8; KEY_SIZE];
    for (i, word) in state[..4].iter().chain(&state[12..]).enumerate() {
        out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    state.zeroize();
    out
}

/// Split a 24-byte XChaCha20 nonce into the HChaCha20 subkey and the
/// 12-byte inner nonce (`[0, 0, 0, 0] || nonce[16..24]`).
pub fn derive_subkey(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
) -> (Zeroizing<[u8; KEY_SIZE]>, [u8; INNER_NONCE_SIZE]) {
    let mut head = [0u8; 16];
    head.copy_from_slice(&nonce[..16]);
    let subkey = Zeroizing::new(hchacha20(key, &head));

    let mut inner = [0u8; INNER_NONCE_SIZE];
    inner[4..].copy_from_slice(&nonce[16..]);
    (subkey, inner)
}
