//! # Protocol Configuration & Constants
//!
//! Every size and algorithm parameter of the keyseal wire format lives here.
//! The envelope and transmission-unit layouts are parsed by fixed offsets,
//! so these values are not tunables: changing one is a wire-format break.

// ---------------------------------------------------------------------------
// Asymmetric Parameters
// ---------------------------------------------------------------------------

/// RSA for key wrapping (OAEP) and signatures (PSS).
pub const ASYMMETRIC_ALGORITHM: &str = "RSA";

/// Modulus size for every identity key pair. Signature and wrapped-key sizes
/// are derived from this, and both parties assume it when splitting units.
pub const RSA_KEY_BITS: usize = 2048;

/// Public exponent F4.
pub const RSA_PUBLIC_EXPONENT: u64 = 65_537;

/// Modulus length in bytes for [`RSA_KEY_BITS`].
pub const RSA_MODULUS_LENGTH: usize = RSA_KEY_BITS / 8;

/// RSA-PSS signature length for a 2048-bit key. Occupies the tail of every
/// transmission unit.
pub const SIGNATURE_LENGTH: usize = RSA_MODULUS_LENGTH;

/// RSA-OAEP ciphertext length for a 2048-bit key.
pub const WRAPPED_KEY_LENGTH: usize = RSA_MODULUS_LENGTH;

// ---------------------------------------------------------------------------
// Symmetric Parameters
// ---------------------------------------------------------------------------

/// AES-256-GCM for file encryption.
pub const SYMMETRIC_ALGORITHM: &str = "AES-256-GCM";

/// AES-256 key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// GCM nonce length in bytes. 96 bits, drawn fresh for every envelope.
pub const AES_NONCE_LENGTH: usize = 12;

/// GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

/// Fixed prefix of every envelope: `nonce || tag`. An envelope shorter than
/// this cannot be parsed.
pub const ENVELOPE_HEADER_LENGTH: usize = AES_NONCE_LENGTH + AES_TAG_LENGTH;

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Digest used for OAEP, MGF1, PSS and key fingerprints.
pub const HASH_FUNCTION: &str = "SHA-256";

/// SHA-256 output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Derived Limits
// ---------------------------------------------------------------------------

/// Largest message RSA-OAEP/SHA-256 can encrypt under a modulus of
/// `modulus_len` bytes: `k - 2*hLen - 2`. Zero when the modulus is too small
/// to carry any message at all.
pub fn oaep_max_message_len(modulus_len: usize) -> usize {
    modulus_len.saturating_sub(2 * HASH_OUTPUT_LENGTH + 2)
}

/// Maximal PSS salt length for a modulus of `modulus_bits` bits:
/// `emLen - hLen - 2`, with `emLen = ceil((modBits - 1) / 8)`.
pub fn pss_max_salt_len(modulus_bits: usize) -> usize {
    let em_len = modulus_bits.saturating_sub(1).div_ceil(8);
    em_len.saturating_sub(HASH_OUTPUT_LENGTH + 2)
}

/// Signature length produced by an RSA key of `modulus_bits` bits. This is
/// the offset at which a receiver splits a transmission unit.
pub fn signature_len_for_bits(modulus_bits: usize) -> usize {
    modulus_bits.div_ceil(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_header_is_nonce_plus_tag() {
        assert_eq!(ENVELOPE_HEADER_LENGTH, 28);
    }

    #[test]
    fn test_oaep_limit_for_standard_key() {
        assert_eq!(oaep_max_message_len(RSA_MODULUS_LENGTH), 190);
        assert!(AES_KEY_LENGTH <= oaep_max_message_len(RSA_MODULUS_LENGTH));
    }

    #[test]
    fn test_oaep_limit_saturates_for_tiny_modulus() {
        // 512-bit keys leave no room for a 32-byte key under SHA-256 OAEP.
        assert_eq!(oaep_max_message_len(64), 0);
        assert_eq!(oaep_max_message_len(0), 0);
    }

    #[test]
    fn test_pss_max_salt_for_standard_key() {
        assert_eq!(pss_max_salt_len(RSA_KEY_BITS), 222);
    }

    #[test]
    fn test_signature_length_tracks_modulus() {
        assert_eq!(signature_len_for_bits(RSA_KEY_BITS), SIGNATURE_LENGTH);
        assert_eq!(signature_len_for_bits(3072), 384);
        assert_eq!(signature_len_for_bits(2047), 256);
    }

    #[test]
    fn test_crypto_parameter_sizes() {
        assert_eq!(AES_KEY_LENGTH, 32);
        assert_eq!(AES_NONCE_LENGTH, 12);
        assert_eq!(AES_TAG_LENGTH, 16);
        assert_eq!(SIGNATURE_LENGTH, 256);
        assert_eq!(WRAPPED_KEY_LENGTH, 256);
        assert_eq!(HASH_OUTPUT_LENGTH, 32);
    }
}
