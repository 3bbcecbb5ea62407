//! Fingerprint Hashing
//!
//! A seeded 32-bit block hash over raw state bytes. The same key can be
//! hashed repeatedly with different seeds to obtain a chain of
//! independent-looking values; the state table feeds `previous + attempt` as
//! the next seed on every collision retry.
//!
//! # Bit Usage
//!
//! ```text
//! low bits  -> slot index (masked by capacity - 1)
//! high bits -> stored tag (masked by the fingerprint tag mask)
//! ```
//!
//! Both ends of the word are load-bearing, so the final avalanche stage
//! always runs.

/// Hash a byte buffer with the given seed
///
/// Returns 0 for empty input. 16-bit reads are little-endian, so the result
/// does not depend on the host byte order.
///
/// # Example
///
/// ```rust
/// use krepis_reach::domain::fingerprint::hash_bytes;
///
/// assert_eq!(hash_bytes(&[], 7), 0);
/// assert_eq!(hash_bytes(b"state", 1), hash_bytes(b"state", 1));
/// assert_ne!(hash_bytes(b"state", 1), hash_bytes(b"state", 2));
/// ```
#[must_use]
pub fn hash_bytes(data: &[u8], seed: u32) -> u32 {
    if data.is_empty() {
        return 0;
    }

    let mut hash = seed;
    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        hash = mix_block(hash, read16(block[0], block[1]), read16(block[2], block[3]));
    }

    let tail = blocks.remainder();
    match *tail {
        [a, b, c] => {
            hash = hash.wrapping_add(read16(a, b));
            hash ^= hash << 16;
            hash ^= u32::from(c) << 18;
            hash = hash.wrapping_add(hash >> 11);
        }
        [a, b] => {
            hash = hash.wrapping_add(read16(a, b));
            hash ^= hash << 11;
            hash = hash.wrapping_add(hash >> 17);
        }
        [a] => {
            hash = hash.wrapping_add(u32::from(a));
            hash ^= hash << 10;
            hash = hash.wrapping_add(hash >> 1);
        }
        _ => {}
    }

    avalanche(hash)
}

/// Hash a state vector with the given seed
///
/// Equal to `hash_bytes` over the little-endian bytes of `words`, computed
/// without building the byte buffer: each `i32` is exactly one 4-byte block.
///
/// # Example
///
/// ```rust
/// use krepis_reach::domain::fingerprint::{hash_bytes, hash_state};
///
/// let state: [i32; 3] = [3, -1, 70_000];
/// let bytes: Vec<u8> = state.iter().flat_map(|w| w.to_le_bytes()).collect();
/// assert_eq!(hash_state(&state, 9), hash_bytes(&bytes, 9));
/// ```
#[must_use]
pub fn hash_state(words: &[i32], seed: u32) -> u32 {
    if words.is_empty() {
        return 0;
    }

    let mut hash = seed;
    for &word in words {
        let bits = u32::from_le_bytes(word.to_le_bytes());
        hash = mix_block(hash, bits & 0xFFFF, bits >> 16);
    }

    avalanche(hash)
}

#[inline(always)]
fn read16(lo: u8, hi: u8) -> u32 {
    u32::from(u16::from_le_bytes([lo, hi]))
}

#[inline(always)]
fn mix_block(mut hash: u32, lo: u32, hi: u32) -> u32 {
    hash = hash.wrapping_add(lo);
    let tmp = (hi << 11) ^ hash;
    hash = (hash << 16) ^ tmp;
    hash.wrapping_add(hash >> 11)
}

#[inline(always)]
fn avalanche(mut hash: u32) -> u32 {
    hash ^= hash << 3;
    hash = hash.wrapping_add(hash >> 5);
    hash ^= hash << 4;
    hash = hash.wrapping_add(hash >> 17);
    hash ^= hash << 25;
    hash.wrapping_add(hash >> 6)
}
