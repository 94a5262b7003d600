//! # CLI Interface
//!
//! Defines the command-line argument structure for `banknet` using `clap`
//! derive. One binary plays both roles: `serve` runs the ledger, every
//! other subcommand is a client talking to it.

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use std::fmt;
use std::str::FromStr;

use banknet_protocol::config::{
    DEFAULT_BIND_HOST, DEFAULT_GENESIS_AMOUNT, DEFAULT_GENESIS_OWNER, DEFAULT_PORT,
    DEFAULT_SERVER_ADDR,
};

/// BankNet: a minimal UTXO ledger.
#[derive(Parser, Debug)]
#[command(
    name = "banknet",
    about = "BankNet ledger server and client",
    version,
    propagate_version = true
)]
pub struct BankNetCli {
    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "BANKNET_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the ledger server until Ctrl+C.
    Serve(ServeArgs),
    /// Check that a server is reachable.
    Ping(ClientArgs),
    /// Print the balance of a devnet identity.
    Balance {
        /// Devnet identity name, e.g. `alice`.
        name: String,
        #[command(flatten)]
        client: ClientArgs,
    },
    /// List the unspent outputs of a devnet identity as JSON.
    Utxo {
        name: String,
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Transfer value between two devnet identities.
    Tx {
        from: String,
        to: String,
        amount: u64,
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long, env = "BANKNET_HOST", default_value = DEFAULT_BIND_HOST)]
    pub host: String,

    /// TCP port to listen on.
    #[arg(long, short = 'p', env = "BANKNET_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Genesis allocations as `name:amount`. Repeat for several owners.
    #[arg(
        long = "genesis",
        env = "BANKNET_GENESIS",
        value_delimiter = ',',
        default_values_t = [GenesisAllocation::devnet_default()]
    )]
    pub genesis: Vec<GenesisAllocation>,
}

#[derive(Args, Debug)]
pub struct ClientArgs {
    /// Address of the ledger server.
    #[arg(long, short = 'a', env = "BANKNET_ADDR", default_value = DEFAULT_SERVER_ADDR)]
    pub addr: String,
}

/// One `name:amount` genesis entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisAllocation {
    pub name: String,
    pub amount: u64,
}

impl FromStr for GenesisAllocation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, amount) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected `name:amount`, got `{s}`"))?;
        let name = name.trim();
        if name.is_empty() {
            bail!("genesis entry `{s}` has an empty name");
        }
        let amount = amount
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid amount in genesis entry `{s}`"))?;
        Ok(Self {
            name: name.to_string(),
            amount,
        })
    }
}

impl GenesisAllocation {
    pub fn devnet_default() -> Self {
        Self {
            name: DEFAULT_GENESIS_OWNER.to_string(),
            amount: DEFAULT_GENESIS_AMOUNT,
        }
    }
}

impl fmt::Display for GenesisAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.amount)
    }
}
