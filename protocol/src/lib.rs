// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # BankNet Protocol — Core Library
//!
//! A minimal ledger that tracks ownership of fungible value as a set of
//! unspent, signature-locked outputs, and validates transfers between
//! owners.
//!
//! Three properties matter above everything else:
//!
//! 1. **Conservation.** Value is only created by administrative issuance;
//!    every transfer spends exactly what it creates.
//! 2. **Authorization.** Spending an output requires an Ed25519 signature
//!    from the key it is locked to, over a message that commits to every
//!    output of the spending transaction.
//! 3. **No double spend.** Validation and application happen under one
//!    write lock, so an output can leave the ledger only once.
//!
//! ## Architecture
//!
//! - **crypto** — Ed25519 keys and signatures, SHA-256 helpers.
//! - **codec** — Deterministic bincode encoding for the wire and for
//!   spend messages.
//! - **transaction** — Outpoints, inputs, outputs, transfer construction
//!   and signing.
//! - **ledger** — The UTXO set and its atomic validate-then-apply.
//! - **identity** — Deterministic devnet keypairs from names.
//! - **network** — Length-prefixed request/response protocol over TCP.
//! - **config** — Protocol constants and limits.
//!
//! ## Quick Start
//!
//! ```
//! use banknet_protocol::identity::{user_keypair, user_public_key};
//! use banknet_protocol::ledger::Ledger;
//! use banknet_protocol::transaction::TransferBuilder;
//!
//! let ledger = Ledger::new();
//! let alice = user_keypair("alice");
//! ledger.issue(1_000, alice.public_key()).unwrap();
//!
//! let tx = TransferBuilder::new(&alice)
//!     .recipient(user_public_key("bob"))
//!     .amount(400)
//!     .candidates(ledger.fetch_utxo(&alice.public_key()))
//!     .build()
//!     .unwrap();
//! ledger.handle_transaction(&tx).unwrap();
//!
//! assert_eq!(ledger.fetch_balance(&user_public_key("bob")), 400);
//! assert_eq!(ledger.fetch_balance(&alice.public_key()), 600);
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod ledger;
pub mod network;
pub mod transaction;
