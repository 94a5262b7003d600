//! Maps each request onto the ledger operation that answers it.
//!
//! Pure and synchronous: no I/O, so it can be tested without a socket.
//! Issuance is deliberately absent; a remote peer can only read balances
//! and submit signed transactions.

use tracing::{debug, warn};

use super::message::{Request, Response, TxOutcome};
use crate::config::MAX_UTXO_REPLY;
use crate::ledger::Ledger;
use crate::transaction::types::TxOut;

pub fn dispatch(ledger: &Ledger, request: Request) -> Response {
    debug!(command = request.command(), "dispatching request");
    match request {
        Request::Ping => Response::Pong,
        Request::Balance(public_key) => Response::FetchBalance(ledger.fetch_balance(&public_key)),
        Request::Utxo(public_key) => {
            Response::ResponseUtxo(cap_utxo_reply(ledger.fetch_utxo(&public_key)))
        }
        Request::Tx(tx) => {
            let outcome = match ledger.handle_transaction(&tx) {
                Ok(()) => TxOutcome::Accepted,
                Err(e) => TxOutcome::Rejected {
                    reason: e.to_string(),
                },
            };
            Response::TxResponse(outcome)
        }
    }
}

/// Trim a `utxo` reply to [`MAX_UTXO_REPLY`] outputs, keeping the largest
/// amounts. Zero-value outputs can be locked to any key, so the set an
/// owner holds has no upper bound.
fn cap_utxo_reply(mut utxos: Vec<TxOut>) -> Vec<TxOut> {
    if utxos.len() <= MAX_UTXO_REPLY {
        return utxos;
    }
    warn!(
        held = utxos.len(),
        sent = MAX_UTXO_REPLY,
        "utxo reply truncated to largest outputs"
    );
    utxos.sort_by(|a, b| b.amount.cmp(&a.amount));
    utxos.truncate(MAX_UTXO_REPLY);
    utxos
}
