// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # BankNet Node
//!
//! Entry point for the `banknet` binary. Parses CLI arguments, initializes
//! logging, then either serves the ledger or acts as a client against a
//! running server.
//!
//! - `serve`   — run the ledger server, seeded with genesis allocations
//! - `ping`    — check that a server answers
//! - `balance` — print a devnet identity's balance
//! - `utxo`    — list a devnet identity's unspent outputs
//! - `tx`      — build, sign, and submit a transfer
//! - `version` — print build version information

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use banknet_protocol::config::PROTOCOL_VERSION;
use banknet_protocol::identity::{user_keypair, user_public_key};
use banknet_protocol::ledger::Ledger;
use banknet_protocol::network::{Client, Server};
use banknet_protocol::transaction::TransferBuilder;

use cli::{BankNetCli, ClientArgs, Commands, ServeArgs};
use logging::LogFormat;

const DEFAULT_LOG_FILTER: &str = "banknet=info,banknet_protocol=info";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = BankNetCli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    logging::init_logging(DEFAULT_LOG_FILTER, LogFormat::from_str_lossy(&cli.log_format));

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Ping(client) => ping(client).await,
        Commands::Balance { name, client } => balance(&name, client).await,
        Commands::Utxo { name, client } => utxo(&name, client).await,
        Commands::Tx {
            from,
            to,
            amount,
            client,
        } => transfer(&from, &to, amount, client).await,
        Commands::Version => Ok(()),
    }
}

/// Seeds the genesis allocations and serves until SIGINT/SIGTERM.
async fn serve(args: ServeArgs) -> Result<()> {
    let ledger = Arc::new(Ledger::new());

    for allocation in &args.genesis {
        ledger
            .issue(allocation.amount, user_public_key(&allocation.name))
            .with_context(|| format!("failed to issue genesis allocation {allocation}"))?;
        tracing::info!(
            owner = %allocation.name,
            amount = allocation.amount,
            "genesis allocation issued"
        );
    }

    let addr = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&addr, Arc::clone(&ledger))
        .await
        .with_context(|| format!("failed to bind ledger server on {addr}"))?;

    tracing::info!(
        addr = %addr,
        utxo_count = ledger.utxo_count(),
        total_issued = ledger.total_issued(),
        "starting banknet server"
    );

    server
        .run_until(shutdown_signal())
        .await
        .context("ledger server failed")?;

    tracing::info!(
        utxo_count = ledger.utxo_count(),
        total_value = ledger.total_value(),
        "banknet server stopped"
    );
    Ok(())
}

async fn connect(args: &ClientArgs) -> Result<Client> {
    Client::connect(&args.addr)
        .await
        .with_context(|| format!("failed to connect to {}", args.addr))
}

async fn ping(args: ClientArgs) -> Result<()> {
    connect(&args).await?.ping().await.context("ping failed")?;
    println!("pong");
    Ok(())
}

async fn balance(name: &str, args: ClientArgs) -> Result<()> {
    let balance = connect(&args)
        .await?
        .balance(&user_public_key(name))
        .await
        .with_context(|| format!("failed to fetch balance of {name}"))?;
    println!("{balance}");
    Ok(())
}

async fn utxo(name: &str, args: ClientArgs) -> Result<()> {
    let utxos = connect(&args)
        .await?
        .utxo(&user_public_key(name))
        .await
        .with_context(|| format!("failed to fetch utxos of {name}"))?;

    let listing: Vec<serde_json::Value> = utxos
        .iter()
        .map(|out| {
            serde_json::json!({
                "outpoint": out.outpoint().to_string(),
                "amount": out.amount,
                "public_key": out.public_key.to_hex(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

/// Fetches the sender's outputs, builds and signs a transfer locally, and
/// submits it over the same connection.
async fn transfer(from: &str, to: &str, amount: u64, args: ClientArgs) -> Result<()> {
    let sender = user_keypair(from);
    let mut client = connect(&args).await?;

    let candidates = client
        .utxo(&sender.public_key())
        .await
        .with_context(|| format!("failed to fetch utxos of {from}"))?;

    let tx = TransferBuilder::new(&sender)
        .recipient(user_public_key(to))
        .amount(amount)
        .candidates(candidates)
        .build()
        .with_context(|| format!("cannot build transfer of {amount} from {from} to {to}"))?;

    tracing::info!(
        tx_id = %tx.id,
        inputs = tx.tx_ins.len(),
        amount,
        "submitting transaction"
    );

    let outcome = client.submit(&tx).await.context("failed to submit transaction")?;
    println!("{outcome}");
    if !outcome.is_accepted() {
        bail!("transaction {} was rejected", tx.id);
    }
    Ok(())
}

fn print_version() {
    println!("banknet  {}", env!("CARGO_PKG_VERSION"));
    println!("protocol {}", PROTOCOL_VERSION);
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported. If a handler cannot be
/// installed, that signal source is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
