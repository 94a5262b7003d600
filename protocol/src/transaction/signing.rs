//! Input signing.
//!
//! Every input of a transaction signs the same shape of message:
//!
//! ```text
//! spend_message(input) = encode(input.outpoint) || encode(tx.tx_outs)
//! ```
//!
//! Committing to the full output list is what stops an intermediary from
//! redirecting funds: alter any output and every input signature fails.
//! Committing to the outpoint ties each signature to the one output it
//! claims, so a signature cannot be lifted onto a different input.

use thiserror::Error;

use super::builder::Transaction;
use super::types::{Outpoint, TxOut};
use crate::codec::{self, CodecError};
use crate::crypto::keys::{BankKeypair, BankPublicKey};
use crate::crypto::signatures;

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("input index {index} out of range (transaction has {len} inputs)")]
    InputOutOfRange { index: usize, len: usize },

    #[error("failed to encode spend message: {0}")]
    Codec(#[from] CodecError),
}

/// The exact bytes an owner signs to spend `outpoint` into `tx_outs`.
pub fn spend_message(outpoint: &Outpoint, tx_outs: &[TxOut]) -> Result<Vec<u8>, CodecError> {
    let mut message = codec::encode(outpoint)?;
    message.extend_from_slice(&codec::encode(tx_outs)?);
    Ok(message)
}

/// Sign input `index` of `tx` with `keypair`, replacing any existing
/// signature on that input.
///
/// Nothing here checks that `keypair` actually owns the referenced output;
/// a wrong key simply produces a signature the ledger will reject.
pub fn sign_input(
    tx: &mut Transaction,
    index: usize,
    keypair: &BankKeypair,
) -> Result<(), SigningError> {
    let len = tx.tx_ins.len();
    let outpoint = tx
        .tx_ins
        .get(index)
        .map(|tx_in| tx_in.outpoint)
        .ok_or(SigningError::InputOutOfRange { index, len })?;

    let message = spend_message(&outpoint, &tx.tx_outs)?;
    let signature = signatures::sign(keypair, &message);
    tx.tx_ins[index].signature = Some(signature);
    Ok(())
}

/// Sign every input with the same key. Convenience for the common case of
/// one owner spending several of their own outputs.
pub fn sign_all_inputs(tx: &mut Transaction, keypair: &BankKeypair) -> Result<(), SigningError> {
    for index in 0..tx.tx_ins.len() {
        sign_input(tx, index, keypair)?;
    }
    Ok(())
}

/// `true` when input `index` carries a signature that verifies against
/// `public_key` over its spend message.
///
/// Missing signature, out-of-range index, or an unencodable output list all
/// yield `false`.
pub fn verify_input(tx: &Transaction, index: usize, public_key: &BankPublicKey) -> bool {
    let Some(tx_in) = tx.tx_ins.get(index) else {
        return false;
    };
    let Some(signature) = tx_in.signature.as_ref() else {
        return false;
    };
    let Ok(message) = spend_message(&tx_in.outpoint, &tx.tx_outs) else {
        return false;
    };
    signatures::verify(public_key, &message, signature)
}
