//! # Primitive Provider
//!
//! The narrow interface between the keyseal protocol layers and the actual
//! cryptographic implementations. Everything above this module composes
//! primitives; nothing above it implements one.
//!
//! [`RustCrypto`] is the production provider, a thin wrapper over the
//! `aes-gcm`, `rsa` and `sha2` crates with randomness from the OS CSPRNG.
//! The trait exists so the protocol layers can be driven by a different
//! backend (an HSM, a FIPS module, or a deliberately broken provider in
//! tests) without touching wire-format code.
//!
//! Providers report failures through [`ProviderError`]. The protocol layers
//! translate those into their own error kinds and never forward provider
//! detail for authentication failures.

use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes256Gcm, Nonce, Tag,
};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use thiserror::Error;

use crate::config::{
    pss_max_salt_len, AES_KEY_LENGTH, AES_NONCE_LENGTH, AES_TAG_LENGTH, HASH_OUTPUT_LENGTH,
};
use crate::crypto::hash::sha256_array;

/// Failures reported by a primitive provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The secure random source could not produce bytes.
    #[error("secure random source unavailable")]
    RandomUnavailable,

    /// AEAD tag verification failed. Carries no detail.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Any other primitive failure (bad key, oversize message, ...).
    #[error("primitive operation failed: {0}")]
    Primitive(String),
}

/// The primitive operations the protocol layers are built on.
///
/// Implementations must be safe to call concurrently; the protocol never
/// holds a provider across calls and never mutates one.
pub trait CryptoProvider {
    /// Fill `dest` from a cryptographically secure random source.
    fn secure_random(&self, dest: &mut [u8]) -> Result<(), ProviderError>;

    /// AES-256-GCM encryption with empty associated data. Returns the
    /// ciphertext (same length as `plaintext`) and the detached tag.
    fn aead_encrypt(
        &self,
        key: &[u8; AES_KEY_LENGTH],
        nonce: &[u8; AES_NONCE_LENGTH],
        plaintext: &[u8],
    ) -> Result<(Vec<u8>, [u8; AES_TAG_LENGTH]), ProviderError>;

    /// AES-256-GCM decryption. Must verify `tag` before any plaintext is
    /// returned and fail with [`ProviderError::AuthenticationFailed`] otherwise.
    fn aead_decrypt(
        &self,
        key: &[u8; AES_KEY_LENGTH],
        nonce: &[u8; AES_NONCE_LENGTH],
        tag: &[u8; AES_TAG_LENGTH],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProviderError>;

    /// Generate an RSA private key of `bits` bits with public exponent `exponent`.
    fn generate_rsa(&self, bits: usize, exponent: u64) -> Result<RsaPrivateKey, ProviderError>;

    /// RSA-OAEP encryption, SHA-256 for both hash and MGF1, empty label.
    fn rsa_encrypt_oaep(&self, key: &RsaPublicKey, message: &[u8])
        -> Result<Vec<u8>, ProviderError>;

    /// RSA-OAEP decryption with the same parameters as [`Self::rsa_encrypt_oaep`].
    fn rsa_decrypt_oaep(
        &self,
        key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProviderError>;

    /// RSA-PSS signature over SHA-256(`message`), MGF1-SHA-256, maximal salt.
    fn rsa_sign_pss(&self, key: &RsaPrivateKey, message: &[u8]) -> Result<Vec<u8>, ProviderError>;

    /// Verify an RSA-PSS signature produced with the parameters of
    /// [`Self::rsa_sign_pss`].
    fn rsa_verify_pss(
        &self,
        key: &RsaPublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), ProviderError>;

    /// SHA-256 digest.
    fn sha256(&self, data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
        sha256_array(data)
    }
}

/// Production provider backed by the RustCrypto crates and `OsRng`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RustCrypto;

impl RustCrypto {
    fn pss(key_bits: usize) -> Pss {
        Pss::new_with_salt::<Sha256>(pss_max_salt_len(key_bits))
    }
}

impl CryptoProvider for RustCrypto {
    fn secure_random(&self, dest: &mut [u8]) -> Result<(), ProviderError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|_| ProviderError::RandomUnavailable)
    }

    fn aead_encrypt(
        &self,
        key: &[u8; AES_KEY_LENGTH],
        nonce: &[u8; AES_NONCE_LENGTH],
        plaintext: &[u8],
    ) -> Result<(Vec<u8>, [u8; AES_TAG_LENGTH]), ProviderError> {
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|_| ProviderError::Primitive("invalid AES-256 key".into()))?;

        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(nonce), b"", &mut buffer)
            .map_err(|_| ProviderError::Primitive("AES-GCM encryption failed".into()))?;

        let mut tag_bytes = [0u8; AES_TAG_LENGTH];
        tag_bytes.copy_from_slice(&tag);
        Ok((buffer, tag_bytes))
    }

    fn aead_decrypt(
        &self,
        key: &[u8; AES_KEY_LENGTH],
        nonce: &[u8; AES_NONCE_LENGTH],
        tag: &[u8; AES_TAG_LENGTH],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        let cipher =
            Aes256Gcm::new_from_slice(key).map_err(|_| ProviderError::AuthenticationFailed)?;

        // aes-gcm checks the tag before touching the buffer, and on failure we
        // drop the buffer anyway.
        let mut buffer = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(nonce),
                b"",
                &mut buffer,
                Tag::from_slice(tag),
            )
            .map_err(|_| ProviderError::AuthenticationFailed)?;
        Ok(buffer)
    }

    fn generate_rsa(&self, bits: usize, exponent: u64) -> Result<RsaPrivateKey, ProviderError> {
        RsaPrivateKey::new_with_exp(&mut OsRng, bits, &BigUint::from(exponent))
            .map_err(|e| ProviderError::Primitive(e.to_string()))
    }

    fn rsa_encrypt_oaep(
        &self,
        key: &RsaPublicKey,
        message: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        key.encrypt(&mut OsRng, Oaep::new::<Sha256>(), message)
            .map_err(|e| ProviderError::Primitive(e.to_string()))
    }

    fn rsa_decrypt_oaep(
        &self,
        key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        // The rsa crate's error already collapses padding and integer failures;
        // we throw even that away.
        key.decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|_| ProviderError::Primitive("OAEP decryption failed".into()))
    }

    fn rsa_sign_pss(&self, key: &RsaPrivateKey, message: &[u8]) -> Result<Vec<u8>, ProviderError> {
        let digest = self.sha256(message);
        key.sign_with_rng(&mut OsRng, Self::pss(key.n().bits()), &digest)
            .map_err(|e| ProviderError::Primitive(e.to_string()))
    }

    fn rsa_verify_pss(
        &self,
        key: &RsaPublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), ProviderError> {
        let digest = self.sha256(message);
        key.verify(Self::pss(key.n().bits()), &digest, signature)
            .map_err(|e| ProviderError::Primitive(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_random_fills_buffer() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        RustCrypto.secure_random(&mut a).unwrap();
        RustCrypto.secure_random(&mut b).unwrap();
        // 2^-256 chance of a false failure. We'll take it.
        assert_ne!(a, b);
    }

    #[test]
    fn test_aead_detached_roundtrip() {
        let key = [7u8; AES_KEY_LENGTH];
        let nonce = [1u8; AES_NONCE_LENGTH];
        let (ct, tag) = RustCrypto.aead_encrypt(&key, &nonce, b"detached").unwrap();
        assert_eq!(ct.len(), b"detached".len());
        let pt = RustCrypto.aead_decrypt(&key, &nonce, &tag, &ct).unwrap();
        assert_eq!(pt, b"detached");
    }

    #[test]
    fn test_aead_bad_tag_is_authentication_failure() {
        let key = [7u8; AES_KEY_LENGTH];
        let nonce = [1u8; AES_NONCE_LENGTH];
        let (ct, mut tag) = RustCrypto.aead_encrypt(&key, &nonce, b"detached").unwrap();
        tag[0] ^= 0x01;
        assert!(matches!(
            RustCrypto.aead_decrypt(&key, &nonce, &tag, &ct),
            Err(ProviderError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_aead_known_answer_empty_plaintext() {
        // NIST GCM test case 13: zero key, zero IV, empty plaintext.
        let key = [0u8; AES_KEY_LENGTH];
        let nonce = [0u8; AES_NONCE_LENGTH];
        let (ct, tag) = RustCrypto.aead_encrypt(&key, &nonce, b"").unwrap();
        assert!(ct.is_empty());
        assert_eq!(hex::encode(tag), "530f8afbc74536b9a963b4f1c4cb738b");
    }
}
