//! # Transaction Validation Errors and Structural Checks
//!
//! Validation runs in two phases. The structural phase here needs nothing
//! but the transaction itself; the ledger runs it before touching any state.
//! The stateful phase (outpoint lookup, signature check against the found
//! output, value balance) lives in [`crate::ledger`] because it needs the
//! UTXO set.

use std::collections::HashSet;
use thiserror::Error;

use super::builder::Transaction;
use super::types::Outpoint;
use crate::config::{MAX_TX_INPUTS, MAX_TX_OUTPUTS};

/// Why the ledger refused a transaction. Every variant leaves the ledger
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Fails a check that needs no ledger state, or reuses an applied id.
    #[error("malformed transaction: {reason}")]
    MalformedTransaction { reason: String },

    /// The outpoint never existed or has already been spent.
    #[error("unknown outpoint {outpoint}")]
    UnknownOutpoint { outpoint: Outpoint },

    /// The input at `index` is unsigned or its signature does not verify
    /// against the referenced output's key.
    #[error("invalid signature on input {index}")]
    InvalidSignature { index: usize },

    /// Inputs and outputs must balance exactly; there are no fees.
    #[error("value mismatch: inputs {input_sum}, outputs {output_sum}")]
    ValueMismatch { input_sum: u64, output_sum: u64 },
}

impl ValidationError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTransaction {
            reason: reason.into(),
        }
    }
}

/// Stateless checks. Returns the output sum on success so the ledger does
/// not have to recompute it.
pub fn check_structure(tx: &Transaction) -> Result<u64, ValidationError> {
    if tx.tx_ins.is_empty() {
        return Err(ValidationError::malformed("transaction has no inputs"));
    }
    if tx.tx_outs.is_empty() {
        return Err(ValidationError::malformed("transaction has no outputs"));
    }
    if tx.tx_ins.len() > MAX_TX_INPUTS {
        return Err(ValidationError::malformed(format!(
            "too many inputs: {} (max {})",
            tx.tx_ins.len(),
            MAX_TX_INPUTS
        )));
    }
    if tx.tx_outs.len() > MAX_TX_OUTPUTS {
        return Err(ValidationError::malformed(format!(
            "too many outputs: {} (max {})",
            tx.tx_outs.len(),
            MAX_TX_OUTPUTS
        )));
    }

    for (position, out) in tx.tx_outs.iter().enumerate() {
        if out.tx_id != tx.id {
            return Err(ValidationError::malformed(format!(
                "output {position} carries tx id {}, expected {}",
                out.tx_id, tx.id
            )));
        }
        if out.index as usize != position {
            return Err(ValidationError::malformed(format!(
                "output {position} carries index {}",
                out.index
            )));
        }
    }

    let mut seen = HashSet::with_capacity(tx.tx_ins.len());
    for tx_in in &tx.tx_ins {
        if !seen.insert(tx_in.outpoint) {
            return Err(ValidationError::malformed(format!(
                "outpoint {} spent twice",
                tx_in.outpoint
            )));
        }
    }

    tx.output_sum()
        .ok_or_else(|| ValidationError::malformed("output sum overflows u64"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::BankKeypair;
    use crate::transaction::types::{TxId, TxIn, TxOut};

    fn simple_tx() -> Transaction {
        let owner = BankKeypair::generate().public_key();
        let id = TxId::generate();
        Transaction::new(
            id,
            vec![TxIn::unsigned(Outpoint::new(TxId::generate(), 0))],
            vec![
                TxOut::new(id, 0, 60, owner.clone()),
                TxOut::new(id, 1, 40, owner),
            ],
        )
    }

    fn expect_malformed(result: Result<u64, ValidationError>) {
        match result {
            Err(ValidationError::MalformedTransaction { .. }) => {}
            other => panic!("expected MalformedTransaction, got {:?}", other),
        }
    }

    #[test]
    fn well_formed_returns_output_sum() {
        assert_eq!(check_structure(&simple_tx()).unwrap(), 100);
    }

    #[test]
    fn no_inputs_is_malformed() {
        let mut tx = simple_tx();
        tx.tx_ins.clear();
        expect_malformed(check_structure(&tx));
    }

    #[test]
    fn no_outputs_is_malformed() {
        let mut tx = simple_tx();
        tx.tx_outs.clear();
        expect_malformed(check_structure(&tx));
    }

    #[test]
    fn foreign_output_id_is_malformed() {
        let mut tx = simple_tx();
        tx.tx_outs[1].tx_id = TxId::generate();
        expect_malformed(check_structure(&tx));
    }

    #[test]
    fn misnumbered_output_is_malformed() {
        let mut tx = simple_tx();
        tx.tx_outs[1].index = 7;
        expect_malformed(check_structure(&tx));
    }

    #[test]
    fn duplicate_outpoint_is_malformed() {
        let mut tx = simple_tx();
        let dup = tx.tx_ins[0].clone();
        tx.tx_ins.push(dup);
        expect_malformed(check_structure(&tx));
    }

    #[test]
    fn too_many_inputs_is_malformed() {
        let mut tx = simple_tx();
        tx.tx_ins = (0..=MAX_TX_INPUTS as u32)
            .map(|i| TxIn::unsigned(Outpoint::new(TxId::generate(), i)))
            .collect();
        expect_malformed(check_structure(&tx));
    }

    #[test]
    fn overflowing_outputs_are_malformed() {
        let mut tx = simple_tx();
        tx.tx_outs[0].amount = u64::MAX;
        expect_malformed(check_structure(&tx));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = ValidationError::ValueMismatch {
            input_sum: 10,
            output_sum: 11,
        };
        assert_eq!(err.to_string(), "value mismatch: inputs 10, outputs 11");
    }
}
