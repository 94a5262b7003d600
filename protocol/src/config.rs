//! # Protocol Configuration & Constants
//!
//! Every tunable number in BankNet lives here. The node binary exposes the
//! ones an operator might reasonably change as CLI flags; the rest are
//! protocol rules and changing them changes what the ledger accepts.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Library protocol version, reported by `banknet version`.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Network Parameters
// ---------------------------------------------------------------------------

/// Interface the server binds to by default.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default TCP port for the ledger server.
pub const DEFAULT_PORT: u16 = 10000;

/// Address clients dial when none is given.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:10000";

/// Largest frame body accepted on the wire. A transaction with the maximum
/// number of inputs and outputs encodes to well under this.
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Most outputs a single `utxo` reply carries. When an owner holds more,
/// the largest amounts are sent. Sized so a full reply stays far below
/// [`MAX_MESSAGE_BYTES`].
pub const MAX_UTXO_REPLY: usize = 4096;

/// How long the server waits for the next frame on an idle connection.
pub const CONNECTION_READ_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Maximum number of inputs per transaction. Keeps validation bounded while
/// the ledger write lock is held.
pub const MAX_TX_INPUTS: usize = 256;

/// Maximum number of outputs per transaction.
pub const MAX_TX_OUTPUTS: usize = 256;

// ---------------------------------------------------------------------------
// Devnet Identities & Genesis
// ---------------------------------------------------------------------------

/// Domain tag hashed together with a user name to derive a devnet seed.
pub const IDENTITY_SEED_DOMAIN: &str = "banknet/devnet-identity/v1";

/// Owner of the genesis allocation when the operator does not specify one.
pub const DEFAULT_GENESIS_OWNER: &str = "alice";

/// Amount issued to [`DEFAULT_GENESIS_OWNER`] at server start.
pub const DEFAULT_GENESIS_AMOUNT: u64 = 1_000;
