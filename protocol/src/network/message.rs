//! Request and response messages.
//!
//! Each variant has a stable command name (`ping`, `balance`, ...) used in
//! logs and in any human-readable rendering. On the wire the codec encodes
//! the variant by position, so the enums are append-only: never reorder or
//! remove a variant.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::keys::BankPublicKey;
use crate::transaction::builder::Transaction;
use crate::transaction::types::TxOut;

/// Client → server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "balance")]
    Balance(BankPublicKey),
    #[serde(rename = "utxo")]
    Utxo(BankPublicKey),
    #[serde(rename = "tx")]
    Tx(Transaction),
}

impl Request {
    pub fn command(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Balance(_) => "balance",
            Self::Utxo(_) => "utxo",
            Self::Tx(_) => "tx",
        }
    }
}

/// Server → client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    #[serde(rename = "pong")]
    Pong,
    #[serde(rename = "fetch-balance")]
    FetchBalance(u64),
    #[serde(rename = "response-utxo")]
    ResponseUtxo(Vec<TxOut>),
    #[serde(rename = "tx-response")]
    TxResponse(TxOutcome),
    /// The request could not be decoded or processed. The server closes the
    /// connection after sending this.
    #[serde(rename = "error")]
    Error { reason: String },
}

impl Response {
    pub fn command(&self) -> &'static str {
        match self {
            Self::Pong => "pong",
            Self::FetchBalance(_) => "fetch-balance",
            Self::ResponseUtxo(_) => "response-utxo",
            Self::TxResponse(_) => "tx-response",
            Self::Error { .. } => "error",
        }
    }
}

/// The ledger's verdict on a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxOutcome {
    Accepted,
    Rejected { reason: String },
}

impl TxOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for TxOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "Transaction Accepted!"),
            Self::Rejected { reason } => write!(f, "Transaction Rejected: {}", reason),
        }
    }
}
