//! # Cryptographic Layers for keyseal
//!
//! Four small layers stacked on one primitive provider:
//!
//! - **keys** — RSA-2048 identities, single-use AES-256 message keys, PEM
//!   import/export.
//! - **wrapping** — RSA-OAEP (SHA-256) transport of a message key.
//! - **envelope** — AES-256-GCM, `nonce || tag || ciphertext`.
//! - **signing** — RSA-PSS (SHA-256, max salt) over plaintext, and the
//!   `envelope || signature` transmission unit.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. [`provider::RustCrypto`] hands every primitive to an audited
//! RustCrypto crate. The code in this module only picks parameters, lays out
//! bytes, and decides which errors a caller is allowed to tell apart.

pub mod envelope;
pub mod hash;
pub mod keys;
pub mod provider;
pub mod signing;
pub mod wrapping;

#[cfg(test)]
pub(crate) mod test_support;

pub use envelope::{open, seal, Envelope, EnvelopeError};
pub use hash::{fingerprint, sha256};
pub use keys::{
    export_key, generate_asymmetric_key_pair, generate_symmetric_key, import_key, load_key,
    save_key, AsymmetricKey, AsymmetricKeyPair, KeyError, KeyInfo, KeyKind, PrivateKey,
    PublicKey, SymmetricKey,
};
pub use provider::{CryptoProvider, ProviderError, RustCrypto};
pub use signing::{compose, decompose, sign, verify, Signature, SigningError, TransmissionUnit};
pub use wrapping::{unwrap, wrap, KeyWrapError, WrappedKey};
