//! # Hashing Utilities
//!
//! SHA-256 helpers. The ledger itself never hashes anything (transaction ids
//! are random UUIDs and outputs are keyed by outpoint), so the only consumer
//! is seed derivation in [`crate::identity`].

use sha2::{Digest, Sha256};

/// SHA-256 of `data` as a fixed-size array.
///
/// ```
/// use banknet_protocol::crypto::sha256;
///
/// assert_eq!(sha256(b"banknet").len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 over `context || 0x00 || data`.
///
/// The context tag keeps hashes computed for one purpose from colliding with
/// hashes computed for another over the same bytes.
pub fn domain_separated_hash(context: &str, data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(context.as_bytes());
    hasher.update([0x00]);
    hasher.update(data);
    hasher.finalize().into()
}
