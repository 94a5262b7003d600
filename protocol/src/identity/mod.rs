//! # Identity Module
//!
//! Devnet identities: a human-readable name maps to a deterministic Ed25519
//! keypair, so `banknet balance alice` and `banknet tx alice bob 10` work
//! without a wallet file.
//!
//! ```text
//! seed(name) = SHA-256("banknet/devnet-identity/v1" || 0x00 || name)
//! keypair    = Ed25519 signing key from seed(name)
//! ```
//!
//! ## Security
//!
//! Anyone who knows a name knows its private key. These identities exist
//! for demos and tests only. Never lock real value to one.

use crate::config::IDENTITY_SEED_DOMAIN;
use crate::crypto::hash::domain_separated_hash;
use crate::crypto::keys::{BankKeypair, BankPublicKey};

/// The devnet keypair for `name`.
///
/// Names are taken verbatim: `"alice"` and `"Alice"` are different owners.
pub fn user_keypair(name: &str) -> BankKeypair {
    let seed = domain_separated_hash(IDENTITY_SEED_DOMAIN, name.as_bytes());
    BankKeypair::from_seed(&seed)
}

/// The devnet public key for `name`.
pub fn user_public_key(name: &str) -> BankPublicKey {
    user_keypair(name).public_key()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_key() {
        assert_eq!(user_public_key("alice"), user_public_key("alice"));
        assert_eq!(user_keypair("bob"), user_keypair("bob"));
    }

    #[test]
    fn different_names_different_keys() {
        assert_ne!(user_public_key("alice"), user_public_key("bob"));
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_ne!(user_public_key("alice"), user_public_key("Alice"));
    }

    #[test]
    fn keypair_matches_public_key() {
        let kp = user_keypair("carol");
        let sig = kp.sign(b"hello");
        assert!(user_public_key("carol").verify(b"hello", &sig));
    }

    #[test]
    fn seed_is_domain_separated() {
        let raw = crate::crypto::hash::sha256(b"alice");
        assert_ne!(BankKeypair::from_seed(&raw), user_keypair("alice"));
    }
}
