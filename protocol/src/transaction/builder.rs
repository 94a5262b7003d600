//! Transaction structure and transfer construction.
//!
//! [`TransferBuilder`] turns "pay `amount` to `recipient`" into a fully
//! signed [`Transaction`]: it selects inputs from the sender's candidate
//! outputs, emits the payment and change outputs, and signs every input.
//! Signing lives in [`super::signing`]; the builder just drives it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::signing::{sign_input, SigningError};
use super::types::{Outpoint, TxId, TxIn, TxOut};
use crate::config::MAX_TX_INPUTS;
use crate::crypto::keys::{BankKeypair, BankPublicKey};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A BankNet transaction: inputs consumed, outputs created.
///
/// Invariant: `tx_outs[i].tx_id == id` and `tx_outs[i].index == i` for every
/// `i`. Constructors in this crate uphold it; the ledger re-checks it on
/// every submission because a peer can send anything.
///
/// Once every input is signed the transaction is treated as immutable.
/// Changing any output afterwards invalidates every input signature, since
/// each spend message commits to the full output list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub tx_ins: Vec<TxIn>,
    pub tx_outs: Vec<TxOut>,
}

impl Transaction {
    pub fn new(id: TxId, tx_ins: Vec<TxIn>, tx_outs: Vec<TxOut>) -> Self {
        Self { id, tx_ins, tx_outs }
    }

    /// A zero-input transaction minting `amount` to `public_key`.
    ///
    /// Only the ledger's administrative `issue` path should create these;
    /// submitting one through `handle_transaction` is rejected as malformed.
    pub fn issuance(amount: u64, public_key: BankPublicKey) -> Self {
        let id = TxId::generate();
        Self {
            id,
            tx_ins: Vec::new(),
            tx_outs: vec![TxOut::new(id, 0, amount, public_key)],
        }
    }

    /// Outpoints consumed by this transaction, in input order.
    pub fn spent_outpoints(&self) -> impl Iterator<Item = Outpoint> + '_ {
        self.tx_ins.iter().map(|tx_in| tx_in.outpoint)
    }

    /// Sum of output amounts, or `None` on overflow.
    pub fn output_sum(&self) -> Option<u64> {
        self.tx_outs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.amount))
    }

    /// `true` when every input carries a signature.
    pub fn is_fully_signed(&self) -> bool {
        self.tx_ins.iter().all(TxIn::is_signed)
    }

    /// Check input `index`'s signature against `public_key`.
    /// See [`super::signing::verify_input`].
    pub fn verify_input(&self, index: usize, public_key: &BankPublicKey) -> bool {
        super::signing::verify_input(self, index, public_key)
    }
}

// ---------------------------------------------------------------------------
// Build errors
// ---------------------------------------------------------------------------

/// Client-side failures while assembling a transfer. The ledger never
/// returns these.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The candidate outputs cannot cover the requested amount.
    #[error("insufficient funds: have {available}, need {requested}")]
    InsufficientFunds { available: u64, requested: u64 },

    /// A transfer of zero would select no inputs at all.
    #[error("transfer amount must be > 0")]
    ZeroAmount,

    /// The same outpoint was offered twice; the ledger would refuse it.
    #[error("duplicate candidate {outpoint}")]
    DuplicateCandidate { outpoint: Outpoint },

    /// Covering the amount would take more inputs than one transaction may
    /// carry.
    #[error("amount needs more than {max} inputs (covered {covered} of {requested})")]
    TooManyInputs { max: usize, covered: u64, requested: u64 },

    #[error(transparent)]
    Signing(#[from] SigningError),
}

// ---------------------------------------------------------------------------
// TransferBuilder
// ---------------------------------------------------------------------------

/// Builds and signs a simple two-output transfer.
///
/// # Coin selection
///
/// Candidates are consumed greedily **in the order supplied** until their
/// sum reaches the amount. The caller controls that order; the ledger's
/// `fetch_utxo` returns outputs sorted by outpoint, which is the usual
/// source. Zero-value candidates are skipped. Selection fails before
/// signing if a candidate repeats or if more than `MAX_TX_INPUTS` inputs
/// would be needed.
///
/// # Outputs
///
/// Always exactly two: index 0 pays `amount` to the recipient, index 1
/// returns the change to the sender. The change output is emitted even when
/// it is zero so that output indices never depend on the selected inputs.
///
/// ```rust,no_run
/// use banknet_protocol::crypto::keys::BankKeypair;
/// use banknet_protocol::transaction::TransferBuilder;
///
/// let alice = BankKeypair::generate();
/// let bob = BankKeypair::generate();
/// let utxos = Vec::new(); // from Ledger::fetch_utxo(&alice.public_key())
///
/// let tx = TransferBuilder::new(&alice)
///     .recipient(bob.public_key())
///     .amount(400)
///     .candidates(utxos)
///     .build();
/// ```
pub struct TransferBuilder<'a> {
    sender: &'a BankKeypair,
    recipient: Option<BankPublicKey>,
    amount: u64,
    candidates: Vec<TxOut>,
}

impl<'a> TransferBuilder<'a> {
    pub fn new(sender: &'a BankKeypair) -> Self {
        Self {
            sender,
            recipient: None,
            amount: 0,
            candidates: Vec::new(),
        }
    }

    /// Public key that output 0 is locked to. Defaults to the sender.
    pub fn recipient(mut self, public_key: BankPublicKey) -> Self {
        self.recipient = Some(public_key);
        self
    }

    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    /// Outputs the sender believes it owns and that are unspent, in the
    /// order they should be consumed.
    pub fn candidates(mut self, candidates: Vec<TxOut>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Select inputs, emit outputs, and sign every input.
    pub fn build(self) -> Result<Transaction, BuildError> {
        if self.amount == 0 {
            return Err(BuildError::ZeroAmount);
        }

        let mut seen = HashSet::with_capacity(self.candidates.len());
        if let Some(repeat) = self
            .candidates
            .iter()
            .map(TxOut::outpoint)
            .find(|outpoint| !seen.insert(*outpoint))
        {
            return Err(BuildError::DuplicateCandidate { outpoint: repeat });
        }

        let mut tx_ins = Vec::new();
        let mut accumulated: u64 = 0;
        for candidate in self.candidates.iter().filter(|c| c.amount > 0) {
            if accumulated >= self.amount {
                break;
            }
            if tx_ins.len() == MAX_TX_INPUTS {
                return Err(BuildError::TooManyInputs {
                    max: MAX_TX_INPUTS,
                    covered: accumulated,
                    requested: self.amount,
                });
            }
            tx_ins.push(TxIn::unsigned(candidate.outpoint()));
            accumulated = accumulated.saturating_add(candidate.amount);
        }

        if accumulated < self.amount {
            return Err(BuildError::InsufficientFunds {
                available: accumulated,
                requested: self.amount,
            });
        }

        let sender_pk = self.sender.public_key();
        let recipient_pk = self.recipient.unwrap_or_else(|| sender_pk.clone());
        let id = TxId::generate();
        let change = accumulated - self.amount;
        let tx_outs = vec![
            TxOut::new(id, 0, self.amount, recipient_pk),
            TxOut::new(id, 1, change, sender_pk),
        ];

        let mut tx = Transaction::new(id, tx_ins, tx_outs);
        for index in 0..tx.tx_ins.len() {
            sign_input(&mut tx, index, self.sender)?;
        }

        Ok(tx)
    }
}

/// One-call form of [`TransferBuilder`].
pub fn build_transfer(
    candidates: Vec<TxOut>,
    sender: &BankKeypair,
    recipient: BankPublicKey,
    amount: u64,
) -> Result<Transaction, BuildError> {
    TransferBuilder::new(sender)
        .recipient(recipient)
        .amount(amount)
        .candidates(candidates)
        .build()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo(amount: u64, owner: &BankKeypair) -> TxOut {
        TxOut::new(TxId::generate(), 0, amount, owner.public_key())
    }

    #[test]
    fn transfer_emits_payment_and_change() {
        let alice = BankKeypair::generate();
        let bob = BankKeypair::generate();

        let tx = TransferBuilder::new(&alice)
            .recipient(bob.public_key())
            .amount(400)
            .candidates(vec![utxo(1_000, &alice)])
            .build()
            .unwrap();

        assert_eq!(tx.tx_ins.len(), 1);
        assert_eq!(tx.tx_outs.len(), 2);
        assert_eq!(tx.tx_outs[0].amount, 400);
        assert_eq!(tx.tx_outs[0].public_key, bob.public_key());
        assert_eq!(tx.tx_outs[1].amount, 600);
        assert_eq!(tx.tx_outs[1].public_key, alice.public_key());
    }

    #[test]
    fn outputs_carry_transaction_id_and_position() {
        let alice = BankKeypair::generate();
        let tx = TransferBuilder::new(&alice)
            .amount(10)
            .candidates(vec![utxo(10, &alice)])
            .build()
            .unwrap();

        for (position, out) in tx.tx_outs.iter().enumerate() {
            assert_eq!(out.tx_id, tx.id);
            assert_eq!(out.index as usize, position);
        }
    }

    #[test]
    fn exact_amount_still_emits_zero_change() {
        let alice = BankKeypair::generate();
        let bob = BankKeypair::generate();
        let tx = TransferBuilder::new(&alice)
            .recipient(bob.public_key())
            .amount(250)
            .candidates(vec![utxo(250, &alice)])
            .build()
            .unwrap();

        assert_eq!(tx.tx_outs.len(), 2);
        assert_eq!(tx.tx_outs[1].amount, 0);
    }

    #[test]
    fn greedy_selection_stops_once_covered() {
        let alice = BankKeypair::generate();
        let candidates = vec![utxo(100, &alice), utxo(200, &alice), utxo(300, &alice)];
        let expected: Vec<_> = candidates[..2].iter().map(TxOut::outpoint).collect();

        let tx = TransferBuilder::new(&alice)
            .amount(250)
            .candidates(candidates)
            .build()
            .unwrap();

        let selected: Vec<_> = tx.spent_outpoints().collect();
        assert_eq!(selected, expected, "selection follows candidate order");
        assert_eq!(tx.tx_outs[1].amount, 50);
    }

    #[test]
    fn insufficient_funds_reports_totals() {
        let alice = BankKeypair::generate();
        let result = TransferBuilder::new(&alice)
            .amount(500)
            .candidates(vec![utxo(100, &alice), utxo(150, &alice)])
            .build();

        match result {
            Err(BuildError::InsufficientFunds {
                available: 250,
                requested: 500,
            }) => {}
            other => panic!("expected InsufficientFunds, got {:?}", other),
        }
    }

    #[test]
    fn no_candidates_is_insufficient() {
        let alice = BankKeypair::generate();
        let result = TransferBuilder::new(&alice).amount(1).build();
        assert!(matches!(result, Err(BuildError::InsufficientFunds { .. })));
    }

    #[test]
    fn build_transfer_matches_builder() {
        let alice = BankKeypair::generate();
        let bob = BankKeypair::generate();
        let tx = build_transfer(vec![utxo(30, &alice)], &alice, bob.public_key(), 30).unwrap();
        assert_eq!(tx.tx_outs[0].public_key, bob.public_key());
        assert_eq!(tx.tx_outs[1].amount, 0);
        assert!(tx.is_fully_signed());
    }

    #[test]
    fn zero_amount_rejected() {
        let alice = BankKeypair::generate();
        let result = TransferBuilder::new(&alice)
            .amount(0)
            .candidates(vec![utxo(10, &alice)])
            .build();
        assert!(matches!(result, Err(BuildError::ZeroAmount)));
    }

    #[test]
    fn every_input_is_signed() {
        let alice = BankKeypair::generate();
        let tx = TransferBuilder::new(&alice)
            .amount(250)
            .candidates(vec![utxo(100, &alice), utxo(200, &alice)])
            .build()
            .unwrap();
        assert!(tx.is_fully_signed());
    }

    #[test]
    fn each_transfer_gets_a_fresh_id() {
        let alice = BankKeypair::generate();
        let build = || {
            TransferBuilder::new(&alice)
                .amount(5)
                .candidates(vec![utxo(5, &alice)])
                .build()
                .unwrap()
        };
        assert_ne!(build().id, build().id);
    }

    #[test]
    fn issuance_has_single_output_and_no_inputs() {
        let owner = BankKeypair::generate();
        let tx = Transaction::issuance(1_000, owner.public_key());
        assert!(tx.tx_ins.is_empty());
        assert_eq!(tx.tx_outs, vec![TxOut::new(tx.id, 0, 1_000, owner.public_key())]);
    }

    #[test]
    fn output_sum_detects_overflow() {
        let owner = BankKeypair::generate();
        let id = TxId::generate();
        let tx = Transaction::new(
            id,
            Vec::new(),
            vec![
                TxOut::new(id, 0, u64::MAX, owner.public_key()),
                TxOut::new(id, 1, 1, owner.public_key()),
            ],
        );
        assert_eq!(tx.output_sum(), None);
    }

    #[test]
    fn transaction_json_roundtrip() {
        let alice = BankKeypair::generate();
        let tx = TransferBuilder::new(&alice)
            .amount(3)
            .candidates(vec![utxo(7, &alice)])
            .build()
            .unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        let recovered: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, recovered);
    }

    #[test]
    fn repeated_candidate_rejected_before_signing() {
        let alice = BankKeypair::generate();
        let coin = utxo(50, &alice);
        let err = TransferBuilder::new(&alice)
            .amount(80)
            .candidates(vec![coin.clone(), coin.clone()])
            .build()
            .unwrap_err();
        match err {
            BuildError::DuplicateCandidate { outpoint } => assert_eq!(outpoint, coin.outpoint()),
            other => panic!("expected DuplicateCandidate, got {:?}", other),
        }
    }

    #[test]
    fn input_limit_enforced_client_side() {
        let alice = BankKeypair::generate();
        let candidates: Vec<TxOut> = (0..MAX_TX_INPUTS + 1).map(|_| utxo(1, &alice)).collect();
        let err = TransferBuilder::new(&alice)
            .amount(MAX_TX_INPUTS as u64 + 1)
            .candidates(candidates)
            .build()
            .unwrap_err();
        match err {
            BuildError::TooManyInputs { max, covered, .. } => {
                assert_eq!(max, MAX_TX_INPUTS);
                assert_eq!(covered, MAX_TX_INPUTS as u64);
            }
            other => panic!("expected TooManyInputs, got {:?}", other),
        }
    }

    #[test]
    fn exactly_max_inputs_is_allowed() {
        let alice = BankKeypair::generate();
        let candidates: Vec<TxOut> = (0..MAX_TX_INPUTS).map(|_| utxo(1, &alice)).collect();
        let tx = TransferBuilder::new(&alice)
            .amount(MAX_TX_INPUTS as u64)
            .candidates(candidates)
            .build()
            .unwrap();
        assert_eq!(tx.tx_ins.len(), MAX_TX_INPUTS);
    }

    #[test]
    fn zero_value_candidates_are_skipped() {
        let alice = BankKeypair::generate();
        let dust = utxo(0, &alice);
        let coin = utxo(10, &alice);
        let tx = TransferBuilder::new(&alice)
            .amount(10)
            .candidates(vec![dust, coin.clone()])
            .build()
            .unwrap();
        assert_eq!(tx.spent_outpoints().collect::<Vec<_>>(), vec![coin.outpoint()]);
    }
}
