//! # Key Wrapping
//!
//! Encrypts a per-message [`SymmetricKey`] under a recipient's RSA public key
//! (RSA-OAEP, SHA-256 hash, MGF1-SHA-256, empty label) so it can travel next
//! to the ciphertext it unlocks.
//!
//! ## Failure model
//!
//! Unwrapping fails in exactly one way: [`KeyWrapError::Unwrapping`]. Wrong
//! private key, flipped bits, truncated input and a plaintext of the wrong
//! length are indistinguishable to the caller.
//!
//! The wrap side validates the OAEP size bound against the actual recipient
//! modulus instead of assuming a 2048-bit key.

use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::{oaep_max_message_len, AES_KEY_LENGTH};
use crate::crypto::keys::{PrivateKey, PublicKey, SymmetricKey};
use crate::crypto::provider::{CryptoProvider, RustCrypto};

/// Errors from wrapping or unwrapping a message key.
#[derive(Debug, Error)]
pub enum KeyWrapError {
    #[error("key of {len} bytes exceeds the OAEP limit of {max} bytes for this recipient key")]
    KeyTooLarge { len: usize, max: usize },

    #[error("key wrapping failed")]
    Wrapping,

    #[error("key unwrapping failed")]
    Unwrapping,
}

/// A symmetric key encrypted under a recipient's public key. Raw bytes, no
/// framing; this is also the on-disk encrypted-key file format.
#[derive(Clone, PartialEq, Eq)]
pub struct WrappedKey(Vec<u8>);

impl WrappedKey {
    /// Accept wrapped key bytes read from a file or the wire. Length is
    /// checked against the recipient modulus at unwrap time.
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

impl std::fmt::Debug for WrappedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WrappedKey({} bytes)", self.0.len())
    }
}

/// Wrap `symmetric_key` for `recipient`.
pub fn wrap(symmetric_key: &SymmetricKey, recipient: &PublicKey) -> Result<WrappedKey, KeyWrapError> {
    wrap_with(&RustCrypto, symmetric_key, recipient)
}

/// [`wrap`] through an explicit provider.
pub fn wrap_with<P: CryptoProvider + ?Sized>(
    provider: &P,
    symmetric_key: &SymmetricKey,
    recipient: &PublicKey,
) -> Result<WrappedKey, KeyWrapError> {
    wrap_bytes(provider, symmetric_key.as_bytes(), recipient)
}

/// Wrap arbitrary key bytes. Split out from [`wrap_with`] so the size bound
/// is checked on the bytes actually handed to OAEP.
pub(crate) fn wrap_bytes<P: CryptoProvider + ?Sized>(
    provider: &P,
    key_bytes: &[u8],
    recipient: &PublicKey,
) -> Result<WrappedKey, KeyWrapError> {
    let max = oaep_max_message_len(recipient.modulus_len());
    if key_bytes.len() > max {
        return Err(KeyWrapError::KeyTooLarge {
            len: key_bytes.len(),
            max,
        });
    }

    let wrapped = provider
        .rsa_encrypt_oaep(recipient.as_rsa(), key_bytes)
        .map_err(|_| KeyWrapError::Wrapping)?;

    debug!(
        recipient_bits = recipient.bits(),
        wrapped_len = wrapped.len(),
        "wrapped message key"
    );
    Ok(WrappedKey(wrapped))
}

/// Recover the symmetric key from `wrapped` with the recipient's private key.
pub fn unwrap(wrapped: &WrappedKey, recipient: &PrivateKey) -> Result<SymmetricKey, KeyWrapError> {
    unwrap_with(&RustCrypto, wrapped, recipient)
}

/// [`unwrap`] through an explicit provider.
pub fn unwrap_with<P: CryptoProvider + ?Sized>(
    provider: &P,
    wrapped: &WrappedKey,
    recipient: &PrivateKey,
) -> Result<SymmetricKey, KeyWrapError> {
    let recovered = Zeroizing::new(
        provider
            .rsa_decrypt_oaep(recipient.as_rsa(), wrapped.as_bytes())
            .map_err(|_| KeyWrapError::Unwrapping)?,
    );

    // A valid OAEP decryption of something that isn't an AES-256 key is still
    // a failed unwrap.
    if recovered.len() != AES_KEY_LENGTH {
        return Err(KeyWrapError::Unwrapping);
    }
    SymmetricKey::try_from_slice(&recovered).ok_or(KeyWrapError::Unwrapping)
}
