//! Content fingerprinting.
//!
//! An article's `texto_plano` is hashed so a re-import of an unchanged
//! source can be recognized without diffing the artifact. Plate-block ids
//! stay random between runs; the fingerprint does not.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `input`, lowercase.
pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Fingerprint of an article's `texto_plano`.
///
/// The input is already annotation-stripped and in emit order, so the value
/// is stable across runs over the same source.
pub fn content_hash(texto_plano: &str) -> String {
    sha256_hex(texto_plano)
}
