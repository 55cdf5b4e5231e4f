//! # Signing & Transmission Units
//!
//! RSA-PSS signatures over plaintext (SHA-256 digest, MGF1-SHA-256, maximal
//! salt) and the `envelope || signature` framing that carries them.
//!
//! Signatures cover the plaintext, not the envelope, so a receiver has to
//! open the envelope before it can verify. GCM still rejects ciphertext
//! tampering on its own; what the signature adds is origin.
//!
//! [`verify`] returns a `bool`. Any failure, from a wrong key to garbage
//! signature bytes, is just `false`.

use thiserror::Error;
use tracing::debug;

use crate::crypto::envelope::{Envelope, EnvelopeError};
use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::crypto::provider::{CryptoProvider, ProviderError, RustCrypto};

/// Errors from producing a signature or splitting a transmission unit.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("secure random source unavailable")]
    EntropySource,

    #[error("signing failed")]
    SigningFailed,

    #[error("malformed transmission unit: {len} bytes, signature alone is {signature_len}")]
    MalformedUnit { len: usize, signature_len: usize },

    /// The bytes ahead of the signature are too short to be an envelope.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

/// An RSA-PSS signature. As long as the signer's modulus.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({} bytes)", self.0.len())
    }
}

/// `envelope || signature`, the unit that goes over the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct TransmissionUnit(Vec<u8>);

impl TransmissionUnit {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for TransmissionUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransmissionUnit({} bytes)", self.0.len())
    }
}

/// Sign `plaintext` with the sender's private key.
///
/// PSS salts are random, so signing the same message twice gives two
/// different signatures. Both verify.
pub fn sign(plaintext: &[u8], signer: &PrivateKey) -> Result<Signature, SigningError> {
    sign_with(&RustCrypto, plaintext, signer)
}

/// [`sign`] through an explicit provider.
pub fn sign_with<P: CryptoProvider + ?Sized>(
    provider: &P,
    plaintext: &[u8],
    signer: &PrivateKey,
) -> Result<Signature, SigningError> {
    let sig = provider
        .rsa_sign_pss(signer.as_rsa(), plaintext)
        .map_err(|e| match e {
            ProviderError::RandomUnavailable => SigningError::EntropySource,
            _ => SigningError::SigningFailed,
        })?;

    debug!(
        signer_bits = signer.bits(),
        plaintext_len = plaintext.len(),
        "signed plaintext"
    );
    Ok(Signature(sig))
}

/// Check `signature` over `plaintext` against the signer's public key.
///
/// ```no_run
/// use keyseal_protocol::crypto::{generate_asymmetric_key_pair, sign, verify};
///
/// let kp = generate_asymmetric_key_pair().unwrap();
/// let sig = sign(b"hello", kp.private_key()).unwrap();
/// assert!(verify(b"hello", &sig, kp.public_key()));
/// assert!(!verify(b"hullo", &sig, kp.public_key()));
/// ```
pub fn verify(plaintext: &[u8], signature: &Signature, signer: &PublicKey) -> bool {
    verify_with(&RustCrypto, plaintext, signature, signer)
}

/// [`verify`] through an explicit provider.
pub fn verify_with<P: CryptoProvider + ?Sized>(
    provider: &P,
    plaintext: &[u8],
    signature: &Signature,
    signer: &PublicKey,
) -> bool {
    match provider.rsa_verify_pss(signer.as_rsa(), plaintext, signature.as_bytes()) {
        Ok(()) => true,
        Err(e) => {
            debug!(signature_len = signature.len(), "signature rejected: {}", e);
            false
        }
    }
}

/// Append `signature` to the wire form of `envelope`.
pub fn compose(envelope: &Envelope, signature: &Signature) -> TransmissionUnit {
    let mut out = envelope.to_bytes();
    out.extend_from_slice(signature.as_bytes());
    TransmissionUnit(out)
}

/// Split a unit into its envelope and the trailing `signature_size` bytes.
///
/// `signature_size` is the signer's modulus length in bytes (256 for
/// RSA-2048); the unit itself doesn't record it.
pub fn decompose(unit: &[u8], signature_size: usize) -> Result<(Envelope, Signature), SigningError> {
    if unit.len() < signature_size {
        return Err(SigningError::MalformedUnit {
            len: unit.len(),
            signature_len: signature_size,
        });
    }

    let (envelope, signature) = unit.split_at(unit.len() - signature_size);
    let envelope = Envelope::from_bytes(envelope)?;
    Ok((envelope, Signature(signature.to_vec())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENVELOPE_HEADER_LENGTH, SIGNATURE_LENGTH};
    use crate::crypto::envelope::seal;
    use crate::crypto::keys::SymmetricKey;
    use crate::crypto::test_support::{alice, bob, NoEntropy};

    #[test]
    fn test_sign_verify_roundtrip() {
        let kp = alice();
        let sig = sign(b"pay bob 10", kp.private_key()).unwrap();
        assert_eq!(sig.len(), SIGNATURE_LENGTH);
        assert!(verify(b"pay bob 10", &sig, kp.public_key()));
    }

    #[test]
    fn test_signatures_are_randomized() {
        let kp = alice();
        let s1 = sign(b"same message", kp.private_key()).unwrap();
        let s2 = sign(b"same message", kp.private_key()).unwrap();
        assert_ne!(s1, s2);
        assert!(verify(b"same message", &s1, kp.public_key()));
        assert!(verify(b"same message", &s2, kp.public_key()));
    }

    #[test]
    fn test_verify_rejects_modified_message() {
        let kp = alice();
        let sig = sign(b"pay bob 10", kp.private_key()).unwrap();
        assert!(!verify(b"pay bob 1000", &sig, kp.public_key()));
    }

    #[test]
    fn test_verify_rejects_other_signer() {
        let sig = sign(b"from alice", alice().private_key()).unwrap();
        assert!(!verify(b"from alice", &sig, bob().public_key()));
    }

    #[test]
    fn test_verify_garbage_signature_is_false() {
        let pk = alice().public_key();
        for sig in [vec![], vec![0u8; 10], vec![0xFF; 256], vec![0u8; 512]] {
            assert!(!verify(b"anything", &Signature::from_bytes(sig), pk));
        }
    }

    #[test]
    fn test_verify_flipped_signature_bit_is_false() {
        let kp = alice();
        let mut bytes = sign(b"msg", kp.private_key()).unwrap().into_bytes();
        bytes[128] ^= 0x04;
        assert!(!verify(b"msg", &Signature::from_bytes(bytes), kp.public_key()));
    }

    #[test]
    fn test_sign_without_entropy_fails() {
        assert!(matches!(
            sign_with(&NoEntropy, b"x", alice().private_key()),
            Err(SigningError::EntropySource)
        ));
    }

    #[test]
    fn test_compose_decompose() {
        let k = SymmetricKey::generate().unwrap();
        let env = seal(b"hello", &k).unwrap();
        let sig = sign(b"hello", alice().private_key()).unwrap();

        let unit = compose(&env, &sig);
        assert_eq!(unit.len(), ENVELOPE_HEADER_LENGTH + 5 + SIGNATURE_LENGTH);

        let (env2, sig2) = decompose(unit.as_bytes(), SIGNATURE_LENGTH).unwrap();
        assert_eq!(env2, env);
        assert_eq!(sig2, sig);
    }

    #[test]
    fn test_decompose_short_unit_is_malformed() {
        assert!(matches!(
            decompose(&[0u8; 255], 256),
            Err(SigningError::MalformedUnit {
                len: 255,
                signature_len: 256
            })
        ));
    }

    #[test]
    fn test_decompose_without_room_for_envelope() {
        // Long enough for the signature, not for an envelope header.
        assert!(matches!(
            decompose(&[0u8; 256 + 10], 256),
            Err(SigningError::Envelope(EnvelopeError::MalformedEnvelope { len: 10 }))
        ));
    }

    #[test]
    fn test_debug_output() {
        let sig = Signature::from_bytes(vec![1; 256]);
        assert_eq!(format!("{:?}", sig), "Signature(256 bytes)");
        let unit = TransmissionUnit::from_bytes(vec![1; 300]);
        assert_eq!(format!("{:?}", unit), "TransmissionUnit(300 bytes)");
    }
}
