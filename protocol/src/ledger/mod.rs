//! # Ledger
//!
//! The authoritative set of unspent outputs and the only thing allowed to
//! change it.
//!
//! ## Concurrency
//!
//! State lives behind a single `parking_lot::RwLock`:
//!
//! - [`Ledger::handle_transaction`] and [`Ledger::issue`] hold the write lock
//!   for their whole duration, so validation and application form one
//!   indivisible step. Two submissions racing to spend the same outpoint
//!   serialise; the loser sees `UnknownOutpoint`.
//! - Reads take the read lock and never observe a half-applied transaction.
//!
//! The ledger never blocks on I/O and has no timeouts; those belong to the
//! transport.
//!
//! ## Invariants
//!
//! - `total_value() == total_issued()` after any sequence of operations.
//! - An outpoint leaves the set at most once.
//! - A rejected transaction leaves the set untouched.

pub mod state;

use std::collections::BTreeMap;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::crypto::keys::BankPublicKey;
use crate::transaction::builder::Transaction;
use crate::transaction::types::{Outpoint, TxOut};
use crate::transaction::verification::ValidationError;

pub use state::UtxoState;

/// Failures of administrative ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("issuing {requested} would overflow total supply (currently {issued})")]
    SupplyOverflow { issued: u64, requested: u64 },
}

/// Shared, thread-safe UTXO ledger. Construct once and share as
/// `Arc<Ledger>`.
#[derive(Debug, Default)]
pub struct Ledger {
    state: RwLock<UtxoState>,
}

impl Ledger {
    /// An empty ledger: no outputs, nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` to `public_key` as a zero-input transaction.
    ///
    /// Administrative only. The output is inserted without validation and
    /// is not reachable through the request dispatcher.
    pub fn issue(&self, amount: u64, public_key: BankPublicKey) -> Result<Transaction, LedgerError> {
        let tx = Transaction::issuance(amount, public_key);
        let mut state = self.state.write();
        let issued = state.issued_total();
        state.issue(&tx).ok_or(LedgerError::SupplyOverflow {
            issued,
            requested: amount,
        })?;

        info!(
            tx_id = %tx.id,
            amount,
            owner = %tx.tx_outs[0].public_key,
            total_issued = state.issued_total(),
            "issued value"
        );
        Ok(tx)
    }

    /// Every unspent output locked to `public_key`, ordered by outpoint.
    pub fn fetch_utxo(&self, public_key: &BankPublicKey) -> Vec<TxOut> {
        let state = self.state.read();
        let utxos: Vec<TxOut> = state.owned_by(public_key).cloned().collect();
        debug!(owner = %public_key, count = utxos.len(), "fetched utxos");
        utxos
    }

    /// Sum of every unspent output locked to `public_key`; zero if none.
    pub fn fetch_balance(&self, public_key: &BankPublicKey) -> u64 {
        let state = self.state.read();
        let balance = state
            .owned_by(public_key)
            .fold(0u64, |acc, out| acc.saturating_add(out.amount));
        debug!(owner = %public_key, balance, "fetched balance");
        balance
    }

    /// Check `tx` against a consistent view of the current state.
    ///
    /// Purely advisory: by the time the caller acts on the answer another
    /// submission may have changed the state. Use
    /// [`handle_transaction`](Self::handle_transaction) to commit.
    pub fn validate_transaction(&self, tx: &Transaction) -> Result<(), ValidationError> {
        self.state.read().validate(tx)
    }

    /// Validate and apply `tx` as one atomic step.
    ///
    /// The only entry point for untrusted submissions. On error the ledger
    /// is exactly as it was.
    pub fn handle_transaction(&self, tx: &Transaction) -> Result<(), ValidationError> {
        let mut state = self.state.write();
        if let Err(e) = state.validate(tx) {
            warn!(tx_id = %tx.id, error = %e, "transaction rejected");
            return Err(e);
        }
        state.apply(tx);

        info!(
            tx_id = %tx.id,
            inputs = tx.tx_ins.len(),
            outputs = tx.tx_outs.len(),
            utxo_count = state.len(),
            "transaction applied"
        );
        Ok(())
    }

    /// Sum of every unspent output.
    pub fn total_value(&self) -> u64 {
        self.state.read().total_value()
    }

    /// Sum of every amount ever issued.
    pub fn total_issued(&self) -> u64 {
        self.state.read().issued_total()
    }

    pub fn utxo_count(&self) -> usize {
        self.state.read().len()
    }

    pub fn contains(&self, outpoint: &Outpoint) -> bool {
        self.state.read().contains(outpoint)
    }

    /// A consistent copy of the whole unspent set, for audits and tests.
    pub fn snapshot(&self) -> BTreeMap<Outpoint, TxOut> {
        self.state.read().to_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::BankKeypair;
    use crate::transaction::builder::TransferBuilder;
    use std::sync::Arc;

    fn transfer(
        ledger: &Ledger,
        from: &BankKeypair,
        to: &BankKeypair,
        amount: u64,
    ) -> Transaction {
        TransferBuilder::new(from)
            .recipient(to.public_key())
            .amount(amount)
            .candidates(ledger.fetch_utxo(&from.public_key()))
            .build()
            .unwrap()
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = Ledger::new();
        assert_eq!(ledger.utxo_count(), 0);
        assert_eq!(ledger.total_value(), 0);
        assert_eq!(ledger.total_issued(), 0);
    }

    #[test]
    fn issue_credits_owner() {
        let ledger = Ledger::new();
        let alice = BankKeypair::generate();
        let tx = ledger.issue(1_000, alice.public_key()).unwrap();

        assert_eq!(ledger.fetch_balance(&alice.public_key()), 1_000);
        assert_eq!(ledger.fetch_utxo(&alice.public_key()), tx.tx_outs);
        assert!(ledger.contains(&tx.tx_outs[0].outpoint()));
    }

    #[test]
    fn issue_rejects_supply_overflow() {
        let ledger = Ledger::new();
        let alice = BankKeypair::generate();
        ledger.issue(u64::MAX, alice.public_key()).unwrap();

        match ledger.issue(1, alice.public_key()) {
            Err(LedgerError::SupplyOverflow {
                issued: u64::MAX,
                requested: 1,
            }) => {}
            other => panic!("expected SupplyOverflow, got {:?}", other),
        }
        assert_eq!(ledger.utxo_count(), 1);
    }

    #[test]
    fn unknown_key_has_zero_balance() {
        let ledger = Ledger::new();
        let nobody = BankKeypair::generate();
        assert_eq!(ledger.fetch_balance(&nobody.public_key()), 0);
        assert!(ledger.fetch_utxo(&nobody.public_key()).is_empty());
    }

    #[test]
    fn alice_pays_bob() {
        let ledger = Ledger::new();
        let alice = BankKeypair::generate();
        let bob = BankKeypair::generate();
        let genesis = ledger.issue(1_000, alice.public_key()).unwrap();

        let tx = transfer(&ledger, &alice, &bob, 400);
        ledger.handle_transaction(&tx).unwrap();

        assert_eq!(ledger.fetch_balance(&bob.public_key()), 400);
        assert_eq!(ledger.fetch_balance(&alice.public_key()), 600);
        assert!(!ledger.contains(&genesis.tx_outs[0].outpoint()));
        assert_eq!(ledger.total_value(), ledger.total_issued());
    }

    #[test]
    fn validate_transaction_is_read_only() {
        let ledger = Ledger::new();
        let alice = BankKeypair::generate();
        let bob = BankKeypair::generate();
        ledger.issue(50, alice.public_key()).unwrap();

        let tx = transfer(&ledger, &alice, &bob, 20);
        ledger.validate_transaction(&tx).unwrap();
        assert_eq!(ledger.fetch_balance(&alice.public_key()), 50);
        assert_eq!(ledger.fetch_balance(&bob.public_key()), 0);
    }

    #[test]
    fn rejected_transaction_leaves_state_untouched() {
        let ledger = Ledger::new();
        let alice = BankKeypair::generate();
        let bob = BankKeypair::generate();
        ledger.issue(100, alice.public_key()).unwrap();

        let mut tx = transfer(&ledger, &alice, &bob, 40);
        tx.tx_outs[0].amount = 41;

        let before = ledger.snapshot();
        assert!(matches!(
            ledger.handle_transaction(&tx),
            Err(ValidationError::InvalidSignature { index: 0 })
        ));
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn resubmission_is_unknown_outpoint() {
        let ledger = Ledger::new();
        let alice = BankKeypair::generate();
        let bob = BankKeypair::generate();
        ledger.issue(100, alice.public_key()).unwrap();

        let tx = transfer(&ledger, &alice, &bob, 10);
        ledger.handle_transaction(&tx).unwrap();
        let after_first = ledger.snapshot();

        assert!(matches!(
            ledger.handle_transaction(&tx),
            Err(ValidationError::UnknownOutpoint { .. })
        ));
        assert_eq!(ledger.snapshot(), after_first);
    }

    #[test]
    fn ledger_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Ledger>();

        let ledger = Arc::new(Ledger::new());
        let alice = BankKeypair::generate();
        ledger.issue(10, alice.public_key()).unwrap();

        let reader = {
            let ledger = Arc::clone(&ledger);
            let pk = alice.public_key();
            std::thread::spawn(move || ledger.fetch_balance(&pk))
        };
        assert_eq!(reader.join().unwrap(), 10);
    }
}
