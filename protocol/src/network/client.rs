//! Async client for the ledger server.
//!
//! [`Client`] holds one connection and can issue several requests over it.
//! [`send_request`] is the one-shot form: connect, ask, disconnect.

use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

use super::error::NetworkError;
use super::framing::{recv_message, send_message};
use super::message::{Request, Response, TxOutcome};
use crate::crypto::keys::BankPublicKey;
use crate::transaction::builder::Transaction;
use crate::transaction::types::TxOut;

pub struct Client {
    stream: TcpStream,
}

impl Client {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, NetworkError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self { stream })
    }

    /// Send `request` and wait for its reply. A `Response::Error` is
    /// returned as-is; the typed helpers below turn it into an error.
    pub async fn request(&mut self, request: &Request) -> Result<Response, NetworkError> {
        debug!(command = request.command(), "sending request");
        send_message(&mut self.stream, request).await?;
        let response: Response = recv_message(&mut self.stream).await?;
        debug!(command = response.command(), "received response");
        Ok(response)
    }

    pub async fn ping(&mut self) -> Result<(), NetworkError> {
        match self.request(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(unexpected("ping", other)),
        }
    }

    pub async fn balance(&mut self, public_key: &BankPublicKey) -> Result<u64, NetworkError> {
        match self.request(&Request::Balance(public_key.clone())).await? {
            Response::FetchBalance(balance) => Ok(balance),
            other => Err(unexpected("balance", other)),
        }
    }

    pub async fn utxo(&mut self, public_key: &BankPublicKey) -> Result<Vec<TxOut>, NetworkError> {
        match self.request(&Request::Utxo(public_key.clone())).await? {
            Response::ResponseUtxo(utxos) => Ok(utxos),
            other => Err(unexpected("utxo", other)),
        }
    }

    /// Submit a signed transaction. A rejection is a successful round trip
    /// and comes back as `Ok(TxOutcome::Rejected { .. })`.
    pub async fn submit(&mut self, tx: &Transaction) -> Result<TxOutcome, NetworkError> {
        match self.request(&Request::Tx(tx.clone())).await? {
            Response::TxResponse(outcome) => Ok(outcome),
            other => Err(unexpected("tx", other)),
        }
    }
}

fn unexpected(request: &'static str, response: Response) -> NetworkError {
    match response {
        Response::Error { reason } => NetworkError::Remote(reason),
        other => NetworkError::UnexpectedResponse {
            request,
            response: other.command(),
        },
    }
}

/// Connect, send one request, return the reply.
pub async fn send_request<A: ToSocketAddrs>(
    addr: A,
    request: &Request,
) -> Result<Response, NetworkError> {
    Client::connect(addr).await?.request(request).await
}
