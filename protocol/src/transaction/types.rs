//! Core value types for BankNet transactions.
//!
//! Everything here is a plain value: `Outpoint` and `TxId` are `Copy` and
//! totally ordered so they can key ordered maps; `TxIn` and `TxOut` are
//! cloned freely and never mutated once a transaction is signed.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::crypto::keys::{BankPublicKey, BankSignature};

// ---------------------------------------------------------------------------
// TxId
// ---------------------------------------------------------------------------

/// Globally unique transaction identifier: a random (v4) UUID.
///
/// Ids are assigned at construction and never derived from content, so two
/// transactions with identical inputs and outputs still get distinct ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(Uuid);

impl TxId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.0.hyphenated())
    }
}

// ---------------------------------------------------------------------------
// Outpoint
// ---------------------------------------------------------------------------

/// Names exactly one output ever created: `(transaction id, output index)`.
///
/// This is the ledger's lookup key. Ordering is by transaction id, then
/// index, which is what makes ledger iteration deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Outpoint {
    pub tx_id: TxId,
    pub index: u32,
}

impl Outpoint {
    pub fn new(tx_id: TxId, index: u32) -> Self {
        Self { tx_id, index }
    }
}

impl fmt::Display for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.index)
    }
}

// ---------------------------------------------------------------------------
// TxOut
// ---------------------------------------------------------------------------

/// An output: `amount` units locked to `public_key`.
///
/// The output carries its own `(tx_id, index)` so it can be looked up and
/// shipped around without the transaction that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub tx_id: TxId,
    pub index: u32,
    pub amount: u64,
    pub public_key: BankPublicKey,
}

impl TxOut {
    pub fn new(tx_id: TxId, index: u32, amount: u64, public_key: BankPublicKey) -> Self {
        Self {
            tx_id,
            index,
            amount,
            public_key,
        }
    }

    pub fn outpoint(&self) -> Outpoint {
        Outpoint::new(self.tx_id, self.index)
    }
}

// ---------------------------------------------------------------------------
// TxIn
// ---------------------------------------------------------------------------

/// A claimed spend of the output at `outpoint`.
///
/// `signature` is `None` while the transaction is being assembled. The
/// ledger rejects any input that reaches it unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub outpoint: Outpoint,
    pub signature: Option<BankSignature>,
}

impl TxIn {
    /// An input with no signature yet.
    pub fn unsigned(outpoint: Outpoint) -> Self {
        Self {
            outpoint,
            signature: None,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}
