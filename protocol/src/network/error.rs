//! Transport-level errors.

use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame of {len} bytes exceeds limit of {max}")]
    FrameTooLarge { len: usize, max: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("connection closed by peer")]
    ConnectionClosed,

    /// The server answered, but not with the reply this request expects.
    #[error("unexpected reply to `{request}`: got `{response}`")]
    UnexpectedResponse {
        request: &'static str,
        response: &'static str,
    },

    /// The server refused to process the request at all.
    #[error("server error: {0}")]
    Remote(String),
}
