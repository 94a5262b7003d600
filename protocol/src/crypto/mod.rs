//! # Cryptographic Primitives
//!
//! Everything BankNet needs to lock and unlock value:
//!
//! - **Ed25519** for owner keys and spend signatures.
//! - **SHA-256** for deriving deterministic devnet seeds.
//!
//! These are thin, typed wrappers around audited crates. Nothing here is
//! hand-rolled.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{domain_separated_hash, sha256};
pub use keys::{BankKeypair, BankPublicKey, BankSignature, KeyError};
pub use signatures::{sign, verify};
