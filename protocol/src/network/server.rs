//! TCP server: one task per connection, every task sharing one ledger.
//!
//! A connection carries any number of request/response pairs. It ends when
//! the client closes it, when it sits idle past the read timeout, or right
//! after the server replies `Response::Error` to a frame it could not use.
//! A reply that cannot be encoded is swapped for `Response::Error` and the
//! connection stays open.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tracing::{debug, info, warn};

use super::dispatcher::dispatch;
use super::error::NetworkError;
use super::framing::{read_frame, send_message, write_frame};
use super::message::{Request, Response};
use crate::codec;
use crate::config::CONNECTION_READ_TIMEOUT;
use crate::ledger::Ledger;

pub struct Server {
    listener: TcpListener,
    ledger: Arc<Ledger>,
    read_timeout: Duration,
}

impl Server {
    /// Bind `addr`. Port 0 picks a free port; see
    /// [`local_addr`](Self::local_addr).
    pub async fn bind<A: ToSocketAddrs>(addr: A, ledger: Arc<Ledger>) -> Result<Self, NetworkError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            ledger,
            read_timeout: CONNECTION_READ_TIMEOUT,
        })
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever.
    pub async fn run(self) -> Result<(), NetworkError> {
        self.run_until(std::future::pending()).await
    }

    /// Accept connections until `shutdown` completes. Connections already
    /// in flight keep running on their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), NetworkError>
    where
        F: Future<Output = ()>,
    {
        info!(addr = %self.local_addr()?, "ledger server listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("ledger server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                            continue;
                        }
                    };
                    let ledger = Arc::clone(&self.ledger);
                    let read_timeout = self.read_timeout;
                    tokio::spawn(async move {
                        debug!(%peer, "connection opened");
                        if let Err(e) = handle_connection(stream, &ledger, read_timeout).await {
                            warn!(%peer, error = %e, "connection ended with error");
                        } else {
                            debug!(%peer, "connection closed");
                        }
                    });
                }
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    ledger: &Ledger,
    read_timeout: Duration,
) -> Result<(), NetworkError> {
    loop {
        let frame = match tokio::time::timeout(read_timeout, read_frame(&mut stream)).await {
            Err(_) => {
                debug!(timeout = ?read_timeout, "idle connection timed out");
                return Ok(());
            }
            Ok(Ok(Some(body))) => body,
            Ok(Ok(None)) => return Ok(()),
            Ok(Err(NetworkError::FrameTooLarge { len, max })) => {
                let reason = format!("frame of {len} bytes exceeds limit of {max}");
                send_message(&mut stream, &Response::Error { reason }).await?;
                return Err(NetworkError::FrameTooLarge { len, max });
            }
            Ok(Err(e)) => return Err(e),
        };

        let request: Request = match codec::decode(&frame) {
            Ok(request) => request,
            Err(e) => {
                let reason = e.to_string();
                send_message(&mut stream, &Response::Error { reason }).await?;
                return Err(e.into());
            }
        };

        let command = request.command();
        let response = dispatch(ledger, request);
        let body = encode_reply(command, &response)?;
        write_frame(&mut stream, &body).await?;
    }
}

/// Encode `response`, falling back to `Response::Error` when it does not fit
/// the codec limit.
fn encode_reply(command: &str, response: &Response) -> Result<Vec<u8>, NetworkError> {
    match codec::encode(response) {
        Ok(body) => Ok(body),
        Err(e) => {
            warn!(command, error = %e, "reply could not be encoded");
            let reason = format!("reply to `{command}` could not be encoded: {e}");
            Ok(codec::encode(&Response::Error { reason })?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_MESSAGE_BYTES;

    #[test]
    fn encodable_reply_passes_through() {
        let body = encode_reply("ping", &Response::Pong).unwrap();
        assert_eq!(codec::decode::<Response>(&body).unwrap(), Response::Pong);
    }

    #[test]
    fn oversized_reply_becomes_error() {
        let huge = Response::Error {
            reason: "x".repeat(MAX_MESSAGE_BYTES + 1),
        };
        let body = encode_reply("utxo", &huge).unwrap();
        assert!(body.len() < MAX_MESSAGE_BYTES);
        match codec::decode::<Response>(&body).unwrap() {
            Response::Error { reason } => assert!(reason.contains("`utxo`"), "{reason}"),
            other => panic!("expected Error, got {:?}", other),
        }
    }
}
