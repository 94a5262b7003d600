//! # Network Module
//!
//! The request/response protocol between clients and the ledger process.
//!
//! ## Architecture
//!
//! ```text
//! message.rs    — Request, Response, TxOutcome and their command names
//! framing.rs    — u32 big-endian length-prefixed frames over async streams
//! dispatcher.rs — Request → ledger operation → Response
//! server.rs     — tokio TCP listener, one task per connection
//! client.rs     — Connection-holding client plus a one-shot helper
//! error.rs      — NetworkError
//! ```
//!
//! ## Design Decisions
//!
//! - Every frame body is a bincode-encoded message from [`crate::codec`],
//!   the same encoding that spend messages are signed over.
//! - The server shares one `Arc<Ledger>` across all connection tasks. The
//!   ledger's own lock provides atomicity, so the transport needs none.
//! - Undecodable frames get a `Response::Error` and the connection closes;
//!   rejected transactions are ordinary `tx-response` replies.

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod framing;
pub mod message;
pub mod server;

pub use client::{send_request, Client};
pub use dispatcher::dispatch;
pub use error::NetworkError;
pub use message::{Request, Response, TxOutcome};
pub use server::Server;
