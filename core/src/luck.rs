//! Deterministic string-keyed random draws.

use sha2::{Digest, Sha256};

/// Maps `key` to a reproducible value in `[0, 1)`.
///
/// The key is hashed with SHA-256 and the leading digest bytes seed a single
/// SplitMix64 step, so neighbouring keys such as `"0,0"` and `"0,1"` produce
/// unrelated draws. The result only depends on the key bytes.
#[must_use]
pub fn luck(key: &str) -> f64 {
    let digest = Sha256::digest(key.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    unit_interval(mix(u64::from_le_bytes(seed)))
}

fn mix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn unit_interval(value: u64) -> f64 {
    const SCALE: f64 = 1.0 / ((1u64 << 53) as f64);
    ((value >> 11) as f64) * SCALE
}
