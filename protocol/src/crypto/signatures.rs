//! # Digital Signatures
//!
//! The signing interface the transaction model consumes:
//! `sign(keypair, message)` and `verify(public_key, message, signature)`.
//!
//! Verification answers yes or no. It does not say *why* a signature failed;
//! callers map `false` onto their own error type.

use super::keys::{BankKeypair, BankPublicKey, BankSignature};

/// Sign `message` with the owner's keypair.
///
/// ```
/// use banknet_protocol::crypto::{sign, verify, BankKeypair};
///
/// let keypair = BankKeypair::generate();
/// let signature = sign(&keypair, b"spend");
/// assert!(verify(&keypair.public_key(), b"spend", &signature));
/// ```
pub fn sign(keypair: &BankKeypair, message: &[u8]) -> BankSignature {
    keypair.sign(message)
}

/// Verify `signature` over `message` against `public_key`.
pub fn verify(public_key: &BankPublicKey, message: &[u8], signature: &BankSignature) -> bool {
    public_key.verify(message, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_signs_and_verifies() {
        let kp = BankKeypair::generate();
        let sig = sign(&kp, b"");
        assert!(verify(&kp.public_key(), b"", &sig));
    }

    #[test]
    fn zeroed_signature_never_verifies() {
        let kp = BankKeypair::generate();
        let sig = BankSignature::from_bytes([0u8; 64]);
        assert!(!verify(&kp.public_key(), b"anything", &sig));
    }

    #[test]
    fn signature_from_other_key_fails() {
        let signer = BankKeypair::generate();
        let other = BankKeypair::generate();
        let sig = sign(&signer, b"message");
        assert!(!verify(&other.public_key(), b"message", &sig));
    }
}
