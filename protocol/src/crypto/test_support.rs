//! Shared fixtures for unit tests: cached RSA identities (key generation is
//! the slowest thing in the suite) and a provider with a dead random source.

use std::sync::OnceLock;

use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::crypto::keys::{AsymmetricKeyPair, PrivateKey};
use crate::crypto::provider::{CryptoProvider, ProviderError, RustCrypto};

pub(crate) fn alice() -> &'static AsymmetricKeyPair {
    static PAIR: OnceLock<AsymmetricKeyPair> = OnceLock::new();
    PAIR.get_or_init(|| AsymmetricKeyPair::generate().unwrap())
}

pub(crate) fn bob() -> &'static AsymmetricKeyPair {
    static PAIR: OnceLock<AsymmetricKeyPair> = OnceLock::new();
    PAIR.get_or_init(|| AsymmetricKeyPair::generate().unwrap())
}

/// An owned copy of Alice's private key, for APIs that consume one.
pub(crate) fn alice_private_owned() -> PrivateKey {
    PrivateKey::from_pem(&alice().private_key().to_pem().unwrap()).unwrap()
}

/// Provider whose random source and key generator always fail. Everything
/// else is delegated to [`RustCrypto`].
pub(crate) struct NoEntropy;

impl CryptoProvider for NoEntropy {
    fn secure_random(&self, _dest: &mut [u8]) -> Result<(), ProviderError> {
        Err(ProviderError::RandomUnavailable)
    }

    fn aead_encrypt(
        &self,
        key: &[u8; 32],
        nonce: &[u8; 12],
        plaintext: &[u8],
    ) -> Result<(Vec<u8>, [u8; 16]), ProviderError> {
        RustCrypto.aead_encrypt(key, nonce, plaintext)
    }

    fn aead_decrypt(
        &self,
        key: &[u8; 32],
        nonce: &[u8; 12],
        tag: &[u8; 16],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        RustCrypto.aead_decrypt(key, nonce, tag, ciphertext)
    }

    fn generate_rsa(&self, _bits: usize, _exponent: u64) -> Result<RsaPrivateKey, ProviderError> {
        Err(ProviderError::RandomUnavailable)
    }

    fn rsa_encrypt_oaep(
        &self,
        _key: &RsaPublicKey,
        _message: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        Err(ProviderError::RandomUnavailable)
    }

    fn rsa_decrypt_oaep(
        &self,
        key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        RustCrypto.rsa_decrypt_oaep(key, ciphertext)
    }

    fn rsa_sign_pss(&self, _key: &RsaPrivateKey, _message: &[u8]) -> Result<Vec<u8>, ProviderError> {
        // PSS salt comes from the random source.
        Err(ProviderError::RandomUnavailable)
    }

    fn rsa_verify_pss(
        &self,
        key: &RsaPublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), ProviderError> {
        RustCrypto.rsa_verify_pss(key, message, signature)
    }
}
