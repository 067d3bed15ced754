//! SHA-256 of saved assets, recorded in the manifest.
//!
//! Computed from the in-memory body right before it is written, so the digest
//! matches what lands on disk without re-reading the file.

use sha2::{Digest, Sha256};

/// SHA-256 digest of `data` as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
