//! # Key Management
//!
//! Ed25519 keypairs, public keys, and signatures for BankNet owners.
//!
//! A [`BankPublicKey`] is the locking condition on every output: whoever can
//! produce a signature that verifies against it may spend the output. There
//! is no script language on top; the key *is* the lock.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (ed25519-dalek does this for us).
//! - Fresh keys come from `OsRng`.
//! - Key bytes are never logged. `Debug` on a keypair prints only the
//!   public half.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur during key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// An owner's signing identity: an Ed25519 signing key.
///
/// `BankKeypair` does not implement `Serialize`. Moving secret material onto
/// the wire or into a file should be an explicit call to
/// [`secret_key_bytes`](Self::secret_key_bytes), never a side effect of
/// serializing a bigger structure.
///
/// # Examples
///
/// ```
/// use banknet_protocol::crypto::keys::BankKeypair;
///
/// let kp = BankKeypair::generate();
/// let sig = kp.sign(b"spend outpoint 0");
/// assert!(kp.public_key().verify(b"spend outpoint 0", &sig));
/// ```
pub struct BankKeypair {
    signing_key: SigningKey,
}

/// The public half of an owner identity. This is the lock on an output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankPublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a spend message.
///
/// Stored as `Vec<u8>` so a peer can hand us any byte string; anything that
/// is not exactly 64 bytes simply fails verification.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSignature {
    bytes: Vec<u8>,
}

impl BankKeypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Deterministic keypair from a 32-byte seed.
    ///
    /// Used by the devnet identity registry. A weak seed gives a weak key.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Reconstruct a keypair from a hex-encoded secret key.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let arr: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&arr))
    }

    /// Returns the public key that locks outputs owned by this keypair.
    pub fn public_key(&self) -> BankPublicKey {
        BankPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message. Ed25519 is deterministic: same key and message,
    /// same signature.
    pub fn sign(&self, message: &[u8]) -> BankSignature {
        let sig = self.signing_key.sign(message);
        BankSignature {
            bytes: sig.to_bytes().to_vec(),
        }
    }

    /// Exports the raw 32-byte secret key. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Clone for BankKeypair {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for BankKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BankKeypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for BankKeypair {
    /// Compared by public key; secret bytes are never compared.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for BankKeypair {}

// ---------------------------------------------------------------------------
// BankPublicKey
// ---------------------------------------------------------------------------

impl BankPublicKey {
    /// Parse and validate a public key from a byte slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature against this key.
    ///
    /// Returns `false` for an invalid point, a signature of the wrong length,
    /// or a failed check. Never panics.
    pub fn verify(&self, message: &[u8], signature: &BankSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let Some(dalek_sig) = signature.to_dalek_signature() else {
            return false;
        };
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key, validating that it is a curve point.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }
}

impl Hash for BankPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for BankPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for BankPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BankPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// BankSignature
// ---------------------------------------------------------------------------

impl BankSignature {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `None` unless the stored bytes are exactly 64 long.
    pub fn to_dalek_signature(&self) -> Option<DalekSignature> {
        let arr: [u8; 64] = self.bytes.as_slice().try_into().ok()?;
        Some(DalekSignature::from_bytes(&arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for BankSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for BankSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "BankSignature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "BankSignature({})", hex_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_sign_verify_roundtrip() {
        let kp = BankKeypair::generate();
        let msg = b"spend (tx, 0)";
        let sig = kp.sign(msg);
        assert!(kp.public_key().verify(msg, &sig));
    }

    #[test]
    fn wrong_message_fails_verification() {
        let kp = BankKeypair::generate();
        let sig = kp.sign(b"correct message");
        assert!(!kp.public_key().verify(b"wrong message", &sig));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let kp1 = BankKeypair::generate();
        let kp2 = BankKeypair::generate();
        let sig = kp1.sign(b"message");
        assert!(!kp2.public_key().verify(b"message", &sig));
    }

    #[test]
    fn truncated_signature_fails_without_panicking() {
        let kp = BankKeypair::generate();
        let sig = kp.sign(b"message");
        let short = BankSignature {
            bytes: sig.as_bytes()[..32].to_vec(),
        };
        assert!(!kp.public_key().verify(b"message", &short));
    }

    #[test]
    fn deterministic_from_seed() {
        let seed = [42u8; 32];
        let kp1 = BankKeypair::from_seed(&seed);
        let kp2 = BankKeypair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
        assert_eq!(kp1, kp2);
    }

    #[test]
    fn deterministic_signatures() {
        let kp = BankKeypair::generate();
        assert_eq!(kp.sign(b"same").as_bytes(), kp.sign(b"same").as_bytes());
    }

    #[test]
    fn secret_key_hex_roundtrip() {
        let kp = BankKeypair::generate();
        let restored = BankKeypair::from_hex(&hex::encode(kp.secret_key_bytes())).unwrap();
        assert_eq!(kp.public_key(), restored.public_key());
    }

    #[test]
    fn invalid_secret_hex_rejected() {
        assert!(BankKeypair::from_hex("deadbeef").is_err());
        assert!(BankKeypair::from_hex("not-hex-at-all").is_err());
    }

    #[test]
    fn public_key_hex_roundtrip() {
        let pk = BankKeypair::generate().public_key();
        let recovered = BankPublicKey::from_hex(&pk.to_hex()).unwrap();
        assert_eq!(pk, recovered);
    }

    #[test]
    fn public_key_rejects_wrong_length() {
        assert!(BankPublicKey::try_from_slice(&[0u8; 16]).is_err());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = BankKeypair::generate();
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("BankKeypair(pub="));
        assert!(!debug_str.contains(&hex::encode(kp.secret_key_bytes())));
    }
}
