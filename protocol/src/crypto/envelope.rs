//! # Authenticated Envelope
//!
//! AES-256-GCM over a message, packed as `nonce(12) || tag(16) || ciphertext`.
//! No length prefix and no associated data: the ciphertext is whatever
//! follows the 28-byte header.
//!
//! Every [`seal`] draws a fresh 96-bit nonce. Message keys are single-use,
//! so the random nonce space is never close to exhausted under one key.
//!
//! [`open`] authenticates before it returns anything. There is no streaming
//! mode and no way to get at plaintext whose tag didn't verify.

use thiserror::Error;
use tracing::debug;

use crate::config::{AES_NONCE_LENGTH, AES_TAG_LENGTH, ENVELOPE_HEADER_LENGTH};
use crate::crypto::keys::SymmetricKey;
use crate::crypto::provider::{CryptoProvider, ProviderError, RustCrypto};

/// Errors from sealing or opening an envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("secure random source unavailable")]
    EntropySource,

    #[error("encryption failed")]
    Encryption,

    /// Tag did not verify. Wrong key, wrong nonce, or tampered bytes; we
    /// don't say which.
    #[error("envelope authentication failed")]
    Authentication,

    #[error("malformed envelope: {len} bytes, need at least 28")]
    MalformedEnvelope { len: usize },
}

/// A sealed message split into its fixed-offset parts.
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    nonce: [u8; AES_NONCE_LENGTH],
    tag: [u8; AES_TAG_LENGTH],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Parse wire bytes. Only the length is checked here; authenticity is
    /// [`open`]'s job.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        if bytes.len() < ENVELOPE_HEADER_LENGTH {
            return Err(EnvelopeError::MalformedEnvelope { len: bytes.len() });
        }

        let (nonce, rest) = bytes.split_at(AES_NONCE_LENGTH);
        let (tag, ciphertext) = rest.split_at(AES_TAG_LENGTH);

        let mut nonce_arr = [0u8; AES_NONCE_LENGTH];
        nonce_arr.copy_from_slice(nonce);
        let mut tag_arr = [0u8; AES_TAG_LENGTH];
        tag_arr.copy_from_slice(tag);

        Ok(Self {
            nonce: nonce_arr,
            tag: tag_arr,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Serialize to `nonce || tag || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn nonce(&self) -> &[u8; AES_NONCE_LENGTH] {
        &self.nonce
    }

    pub fn tag(&self) -> &[u8; AES_TAG_LENGTH] {
        &self.tag
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Equal to the plaintext length; GCM doesn't pad.
    pub fn ciphertext_len(&self) -> usize {
        self.ciphertext.len()
    }

    /// Length on the wire.
    pub fn len(&self) -> usize {
        ENVELOPE_HEADER_LENGTH + self.ciphertext.len()
    }

    /// Always false: even an empty message has a 28-byte header.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
pub fn seal(plaintext: &[u8], key: &SymmetricKey) -> Result<Envelope, EnvelopeError> {
    seal_with(&RustCrypto, plaintext, key)
}

/// [`seal`] through an explicit provider.
pub fn seal_with<P: CryptoProvider + ?Sized>(
    provider: &P,
    plaintext: &[u8],
    key: &SymmetricKey,
) -> Result<Envelope, EnvelopeError> {
    let mut nonce = [0u8; AES_NONCE_LENGTH];
    provider
        .secure_random(&mut nonce)
        .map_err(|_| EnvelopeError::EntropySource)?;

    let (ciphertext, tag) = provider
        .aead_encrypt(key.as_bytes(), &nonce, plaintext)
        .map_err(|_| EnvelopeError::Encryption)?;

    debug!(plaintext_len = plaintext.len(), "sealed envelope");
    Ok(Envelope {
        nonce,
        tag,
        ciphertext,
    })
}

/// Parse `envelope` and decrypt it under `key`.
pub fn open(envelope: &[u8], key: &SymmetricKey) -> Result<Vec<u8>, EnvelopeError> {
    open_with(&RustCrypto, envelope, key)
}

/// [`open`] through an explicit provider.
pub fn open_with<P: CryptoProvider + ?Sized>(
    provider: &P,
    envelope: &[u8],
    key: &SymmetricKey,
) -> Result<Vec<u8>, EnvelopeError> {
    let parsed = Envelope::from_bytes(envelope)?;
    open_envelope_with(provider, &parsed, key)
}

/// Decrypt an already-parsed envelope.
pub fn open_envelope(envelope: &Envelope, key: &SymmetricKey) -> Result<Vec<u8>, EnvelopeError> {
    open_envelope_with(&RustCrypto, envelope, key)
}

/// [`open_envelope`] through an explicit provider.
pub fn open_envelope_with<P: CryptoProvider + ?Sized>(
    provider: &P,
    envelope: &Envelope,
    key: &SymmetricKey,
) -> Result<Vec<u8>, EnvelopeError> {
    provider
        .aead_decrypt(
            key.as_bytes(),
            &envelope.nonce,
            &envelope.tag,
            &envelope.ciphertext,
        )
        .map_err(|e| {
            if !matches!(e, ProviderError::AuthenticationFailed) {
                debug!("AEAD provider failed: {}", e);
            }
            EnvelopeError::Authentication
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::test_support::NoEntropy;
    use std::collections::HashSet;

    fn key() -> SymmetricKey {
        SymmetricKey::generate().unwrap()
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let k = key();
        let plaintext = b"Four score and seven years ago";
        let env = seal(plaintext, &k).unwrap();
        assert_eq!(open(&env.to_bytes(), &k).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_plaintext_is_header_only() {
        let k = key();
        let env = seal(b"", &k).unwrap();
        assert_eq!(env.to_bytes().len(), ENVELOPE_HEADER_LENGTH);
        assert_eq!(env.len(), ENVELOPE_HEADER_LENGTH);
        assert!(open(&env.to_bytes(), &k).unwrap().is_empty());
    }

    #[test]
    fn test_ciphertext_length_matches_plaintext() {
        let k = key();
        for size in [1usize, 15, 16, 17, 1000] {
            let env = seal(&vec![0x42; size], &k).unwrap();
            assert_eq!(env.ciphertext_len(), size);
            assert_eq!(env.to_bytes().len(), ENVELOPE_HEADER_LENGTH + size);
        }
    }

    #[test]
    fn test_layout_is_nonce_tag_ciphertext() {
        let k = key();
        let env = seal(b"layout", &k).unwrap();
        let bytes = env.to_bytes();
        assert_eq!(&bytes[..12], env.nonce());
        assert_eq!(&bytes[12..28], env.tag());
        assert_eq!(&bytes[28..], env.ciphertext());
        assert_eq!(Envelope::from_bytes(&bytes).unwrap(), env);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let env = seal(b"secret", &key()).unwrap();
        assert!(matches!(
            open(&env.to_bytes(), &key()),
            Err(EnvelopeError::Authentication)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails_authentication() {
        let k = key();
        let mut bytes = seal(b"don't touch this", &k).unwrap().to_bytes();
        bytes[30] ^= 0x80;
        assert!(matches!(
            open(&bytes, &k),
            Err(EnvelopeError::Authentication)
        ));
    }

    #[test]
    fn test_tampered_tag_and_nonce_fail_authentication() {
        let k = key();
        let original = seal(b"header bits matter too", &k).unwrap().to_bytes();
        for idx in [0usize, 11, 12, 27] {
            let mut bytes = original.clone();
            bytes[idx] ^= 0x01;
            assert!(matches!(
                open(&bytes, &k),
                Err(EnvelopeError::Authentication)
            ));
        }
    }

    #[test]
    fn test_short_input_is_malformed() {
        let k = key();
        assert!(matches!(
            open(&[0u8; 10], &k),
            Err(EnvelopeError::MalformedEnvelope { len: 10 })
        ));
        assert!(matches!(
            open(&[0u8; 27], &k),
            Err(EnvelopeError::MalformedEnvelope { len: 27 })
        ));
        // Exactly a header parses, then fails on the tag.
        assert!(matches!(
            open(&[0u8; 28], &k),
            Err(EnvelopeError::Authentication)
        ));
    }

    #[test]
    fn test_seal_without_entropy_fails() {
        assert!(matches!(
            seal_with(&NoEntropy, b"x", &key()),
            Err(EnvelopeError::EntropySource)
        ));
    }

    #[test]
    fn test_nonces_are_fresh_per_seal() {
        let k = key();
        let nonces: HashSet<[u8; AES_NONCE_LENGTH]> = (0..1000)
            .map(|_| *seal(b"same", &k).unwrap().nonce())
            .collect();
        assert_eq!(nonces.len(), 1000);
    }

    #[test]
    fn test_open_envelope_accepts_parsed_form() {
        let k = key();
        let env = seal(b"already parsed", &k).unwrap();
        assert_eq!(open_envelope(&env, &k).unwrap(), b"already parsed");
    }

    #[test]
    fn test_debug_does_not_print_bytes() {
        let env = seal(b"quiet", &key()).unwrap();
        assert_eq!(format!("{:?}", env), "Envelope { ciphertext_len: 5 }");
    }
}
