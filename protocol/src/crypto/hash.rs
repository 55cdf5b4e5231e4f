//! # Hashing Utilities
//!
//! SHA-256 is the only hash in keyseal. It parameterizes OAEP, MGF1 and PSS
//! (inside the provider) and produces public key fingerprints, the short
//! identifiers we put in logs and CLI output instead of whole keys.

use sha2::{Digest, Sha256};

use crate::config::HASH_OUTPUT_LENGTH;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use keyseal_protocol::crypto::sha256;
///
/// let hash = sha256(b"keyseal");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    sha256_array(data).to_vec()
}

/// Compute the SHA-256 hash and return a fixed-size array.
pub fn sha256_array(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; HASH_OUTPUT_LENGTH];
    output.copy_from_slice(&result);
    output
}

/// Hex-encoded SHA-256 over a key's DER encoding.
///
/// Callers pass the SubjectPublicKeyInfo DER of a public key, so a key pair
/// and its exported public half always share a fingerprint.
pub fn fingerprint(der: &[u8]) -> String {
    hex::encode(sha256_array(der))
}
