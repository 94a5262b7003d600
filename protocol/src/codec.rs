//! # Deterministic Codec
//!
//! One encoding for everything: wire frames and the spend messages that get
//! signed. Because signatures are computed over encoded bytes, the encoding
//! must be a pure function of the logical value. `bincode` with fixed-width
//! little-endian integers gives us that: struct fields in declaration order,
//! sequences length-prefixed, no maps anywhere in the encoded types.
//!
//! Decoding is bounded by [`MAX_MESSAGE_BYTES`] and rejects trailing bytes,
//! so a peer cannot make us allocate without limit or smuggle data past the
//! end of a valid value.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::MAX_MESSAGE_BYTES;

/// Errors from encoding or decoding a value.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(#[source] bincode::Error),

    #[error("decode failed: {0}")]
    Decode(#[source] bincode::Error),
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_MESSAGE_BYTES as u64)
        .reject_trailing_bytes()
}

/// Encode `value` to its canonical byte form.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    options().serialize(value).map_err(CodecError::Encode)
}

/// Decode a value previously produced by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    options().deserialize(bytes).map_err(CodecError::Decode)
}
