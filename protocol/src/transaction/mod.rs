//! # Transaction Module
//!
//! The UTXO transaction model: outputs locked to public keys, inputs that
//! claim them, and transactions that consume inputs and create outputs.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — Value types (TxId, Outpoint, TxIn, TxOut)
//! builder.rs      — Transaction struct and the fluent TransferBuilder
//! signing.rs      — Spend messages, per-input signing and verification
//! verification.rs — ValidationError and stateless structural checks
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Fetch** — The sender asks the ledger for its unspent outputs.
//! 2. **Build** — [`TransferBuilder`] selects inputs and emits outputs.
//! 3. **Sign** — Each input signs `encode(outpoint) || encode(tx_outs)`.
//! 4. **Submit** — The ledger validates and applies in one atomic step.
//!
//! ## Design Decisions
//!
//! - Transaction ids are random v4 UUIDs, not content hashes.
//! - All amounts are `u64` in the smallest unit, with checked arithmetic
//!   wherever values are summed.
//! - No fees: inputs and outputs must balance exactly.

pub mod builder;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{build_transfer, BuildError, Transaction, TransferBuilder};
pub use signing::{sign_all_inputs, sign_input, spend_message, SigningError};
pub use types::{Outpoint, TxId, TxIn, TxOut};
pub use verification::{check_structure, ValidationError};
