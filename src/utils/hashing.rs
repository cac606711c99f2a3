//! Stable hashing for synthesized cell ids

use sha2::{Digest, Sha256};

/// Deterministic 16-hex-char id for a cell at `position` in an output notebook.
///
/// The result satisfies nbformat's cell id rule (1-64 chars of `[A-Za-z0-9_-]`).
pub fn stable_cell_id(seed: &str, position: usize) -> String {
    let seed_prefix: String = seed.chars().take(1000).collect();
    let hash_input = format!("{position}:{seed_prefix}");
    let mut hasher = Sha256::new();
    hasher.update(hash_input.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)[..16].to_string()
}
