//! Length-prefixed framing over any async byte stream.
//!
//! ```text
//! frame = [u32 BE length][length bytes of bincode body]
//! ```
//!
//! Lengths above [`MAX_MESSAGE_BYTES`] are refused in both directions, so a
//! peer cannot make us allocate an arbitrary buffer.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::error::NetworkError;
use crate::codec;
use crate::config::MAX_MESSAGE_BYTES;

/// Write one frame and flush.
pub async fn write_frame<W>(stream: &mut W, body: &[u8]) -> Result<(), NetworkError>
where
    W: AsyncWrite + Unpin,
{
    if body.len() > MAX_MESSAGE_BYTES {
        return Err(NetworkError::FrameTooLarge {
            len: body.len(),
            max: MAX_MESSAGE_BYTES,
        });
    }

    stream.write_u32(body.len() as u32).await?;
    stream.write_all(body).await?;
    stream.flush().await?;
    Ok(())
}

/// Read one frame.
///
/// Returns `Ok(None)` when the peer closes the stream cleanly before
/// sending a length prefix. EOF inside a frame is an error.
pub async fn read_frame<R>(stream: &mut R) -> Result<Option<Vec<u8>>, NetworkError>
where
    R: AsyncRead + Unpin,
{
    let len = match stream.read_u32().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if len > MAX_MESSAGE_BYTES {
        return Err(NetworkError::FrameTooLarge {
            len,
            max: MAX_MESSAGE_BYTES,
        });
    }

    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await?;
    Ok(Some(body))
}

/// Encode `message` and write it as one frame.
pub async fn send_message<W, T>(stream: &mut W, message: &T) -> Result<(), NetworkError>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let body = codec::encode(message)?;
    write_frame(stream, &body).await
}

/// Read one frame and decode it. A clean close yields
/// [`NetworkError::ConnectionClosed`].
pub async fn recv_message<R, T>(stream: &mut R) -> Result<T, NetworkError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let body = read_frame(stream)
        .await?
        .ok_or(NetworkError::ConnectionClosed)?;
    Ok(codec::decode(&body)?)
}
