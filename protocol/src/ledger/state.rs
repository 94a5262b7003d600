//! # UTXO State
//!
//! The unsynchronised ledger state: the set of unspent outputs keyed by
//! outpoint, the ids of every transaction ever applied, and the running
//! total of issued value. [`super::Ledger`] wraps it in a lock; this type
//! only knows how to check and apply a transaction against itself.
//!
//! ## State Transition
//!
//! A transaction `T` spending outpoints `O1..On` into outputs `X1..Xm`:
//!
//! 1. Check `T` structurally (no state needed).
//! 2. For each `Oi`: it must be in the set, and input `i`'s signature must
//!    verify against that output's key.
//! 3. `sum(amount(Oi)) == sum(amount(Xj))`.
//! 4. `T.id` must never have been applied before.
//! 5. Remove every `Oi`, insert every `Xj`.
//!
//! Steps 1–4 never mutate. Step 5 cannot fail once they pass.

use std::collections::{BTreeMap, HashSet};

use crate::crypto::keys::BankPublicKey;
use crate::transaction::builder::Transaction;
use crate::transaction::types::{Outpoint, TxId, TxOut};
use crate::transaction::verification::{check_structure, ValidationError};

/// Unspent outputs plus the bookkeeping needed to audit them.
#[derive(Debug, Clone, Default)]
pub struct UtxoState {
    utxos: BTreeMap<Outpoint, TxOut>,
    applied: HashSet<TxId>,
    issued_total: u64,
}

impl UtxoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, outpoint: &Outpoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    pub(crate) fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn issued_total(&self) -> u64 {
        self.issued_total
    }

    /// Outputs locked to `public_key`, ordered by outpoint.
    pub fn owned_by<'a>(&'a self, public_key: &'a BankPublicKey) -> impl Iterator<Item = &'a TxOut> {
        self.utxos
            .values()
            .filter(move |out| &out.public_key == public_key)
    }

    /// Sum of every unspent amount. Saturates rather than wrapping; it can
    /// only saturate if the supply invariant is already broken.
    pub fn total_value(&self) -> u64 {
        self.utxos
            .values()
            .fold(0u64, |acc, out| acc.saturating_add(out.amount))
    }

    /// Record an issuance. Returns `None` if the running supply would
    /// overflow, in which case nothing changes.
    pub(crate) fn issue(&mut self, tx: &Transaction) -> Option<()> {
        let minted = tx.output_sum()?;
        let new_total = self.issued_total.checked_add(minted)?;
        self.issued_total = new_total;
        self.applied.insert(tx.id);
        for out in &tx.tx_outs {
            self.utxos.insert(out.outpoint(), out.clone());
        }
        Some(())
    }

    /// Check `tx` against the current state without mutating it.
    ///
    /// Error precedence: structural problems first, then per input in index
    /// order (lookup, then signature), then the value balance, then id reuse.
    pub fn validate(&self, tx: &Transaction) -> Result<(), ValidationError> {
        let output_sum = check_structure(tx)?;

        let mut input_sum: u64 = 0;
        for (index, tx_in) in tx.tx_ins.iter().enumerate() {
            let spent = self
                .utxos
                .get(&tx_in.outpoint)
                .ok_or(ValidationError::UnknownOutpoint {
                    outpoint: tx_in.outpoint,
                })?;

            if !tx.verify_input(index, &spent.public_key) {
                return Err(ValidationError::InvalidSignature { index });
            }

            // Unspent outputs never sum past the issued supply, which is
            // itself bounded by u64, so this only fails on a broken state.
            input_sum = input_sum
                .checked_add(spent.amount)
                .ok_or_else(|| ValidationError::malformed("input sum overflows u64"))?;
        }

        if input_sum != output_sum {
            return Err(ValidationError::ValueMismatch {
                input_sum,
                output_sum,
            });
        }

        if self.applied.contains(&tx.id) {
            return Err(ValidationError::malformed(format!(
                "transaction id {} already applied",
                tx.id
            )));
        }

        Ok(())
    }

    /// Spend every input and create every output. Callers must have run
    /// [`validate`](Self::validate) under the same exclusive borrow.
    pub(crate) fn apply(&mut self, tx: &Transaction) {
        for tx_in in &tx.tx_ins {
            self.utxos.remove(&tx_in.outpoint);
        }
        for out in &tx.tx_outs {
            self.utxos.insert(out.outpoint(), out.clone());
        }
        self.applied.insert(tx.id);
    }

    /// A detached copy of the unspent set.
    pub fn to_map(&self) -> BTreeMap<Outpoint, TxOut> {
        self.utxos.clone()
    }
}
