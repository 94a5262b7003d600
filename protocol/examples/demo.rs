//! Interactive walkthrough of a BankNet ledger.
//!
//! Starts a ledger server on a free local port, issues a genesis allocation
//! to alice, then talks to the server exactly like the `banknet` client
//! does: fetch UTXOs, build and sign a transfer, submit, check balances.
//! It finishes by attempting a double spend and a tampered transfer, both
//! of which the ledger rejects.
//!
//! Run with:
//!   cargo run --example demo

use std::sync::Arc;
use std::time::Instant;

use banknet_protocol::crypto::keys::BankKeypair;
use banknet_protocol::identity::user_keypair;
use banknet_protocol::ledger::Ledger;
use banknet_protocol::network::{Client, NetworkError, Server, TxOutcome};
use banknet_protocol::transaction::{Transaction, TransferBuilder};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!("{BG_BLUE}{BOLD}{WHITE}                                                            {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    BANKNET  --  UTXO Ledger Walkthrough                    {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}                                                            {RESET}");
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]================================================{RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn refused(text: &str) {
    println!("{RED}  [REJECTED] {text}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}  [{label}: {ms:.2} ms]{RESET}");
}

async fn balances(client: &mut Client, owners: &[(&str, &BankKeypair)]) -> Result<(), NetworkError> {
    for (name, keypair) in owners {
        let balance = client.balance(&keypair.public_key()).await?;
        println!("  {BOLD}{name:<8}{RESET} {WHITE}{balance:>8}{RESET}");
    }
    Ok(())
}

fn report(outcome: &TxOutcome) {
    match outcome {
        TxOutcome::Accepted => success(&outcome.to_string()),
        TxOutcome::Rejected { .. } => refused(&outcome.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    banner();

    let alice = user_keypair("alice");
    let bob = user_keypair("bob");
    let carol = user_keypair("carol");
    let owners = [("alice", &alice), ("bob", &bob), ("carol", &carol)];

    section(1, "Start a ledger and issue 1000 to alice");
    let ledger = Arc::new(Ledger::new());
    let genesis = ledger.issue(1_000, alice.public_key())?;
    let server = Server::bind("127.0.0.1:0", Arc::clone(&ledger)).await?;
    let addr = server.local_addr()?;
    tokio::spawn(server.run());
    success(&format!("server listening on {addr}"));
    success(&format!("genesis output {}", genesis.tx_outs[0].outpoint()));

    let mut client = Client::connect(addr).await?;
    client.ping().await?;
    balances(&mut client, &owners).await?;

    section(2, "alice pays bob 400");
    let started = Instant::now();
    let utxos = client.utxo(&alice.public_key()).await?;
    let tx = TransferBuilder::new(&alice)
        .recipient(bob.public_key())
        .amount(400)
        .candidates(utxos.clone())
        .build()?;
    timing("build + sign", started.elapsed());
    for out in &tx.tx_outs {
        println!("  {DIM}output {} -> {}{RESET}", out.index, out.amount);
    }
    report(&client.submit(&tx).await?);
    balances(&mut client, &owners).await?;

    section(3, "bob pays carol 150");
    let tx = TransferBuilder::new(&bob)
        .recipient(carol.public_key())
        .amount(150)
        .candidates(client.utxo(&bob.public_key()).await?)
        .build()?;
    report(&client.submit(&tx).await?);
    balances(&mut client, &owners).await?;

    section(4, "alice tries to spend her genesis output again");
    let replay = TransferBuilder::new(&alice)
        .recipient(carol.public_key())
        .amount(1_000)
        .candidates(utxos)
        .build()?;
    report(&client.submit(&replay).await?);

    section(5, "someone rewrites a signed transfer to pay carol instead");
    let mut tampered: Transaction = TransferBuilder::new(&alice)
        .recipient(bob.public_key())
        .amount(100)
        .candidates(client.utxo(&alice.public_key()).await?)
        .build()?;
    tampered.tx_outs[0].public_key = carol.public_key();
    report(&client.submit(&tampered).await?);

    section(6, "Audit");
    balances(&mut client, &owners).await?;
    println!(
        "  {BOLD}total value{RESET} {} == {BOLD}total issued{RESET} {}",
        ledger.total_value(),
        ledger.total_issued()
    );
    println!();
    Ok(())
}
