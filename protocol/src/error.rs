//! Crate-wide error type.
//!
//! Each crypto layer has its own error enum. [`ProtocolError`] wraps all of
//! them for callers that drive several layers at once (see
//! [`crate::exchange`]), and [`ProtocolError::kind`] flattens them into one
//! taxonomy that is stable across layers.

use thiserror::Error;

use crate::crypto::envelope::EnvelopeError;
use crate::crypto::keys::KeyError;
use crate::crypto::signing::SigningError;
use crate::crypto::wrapping::KeyWrapError;

/// The failure classes a caller can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The secure random source could not produce bytes.
    EntropySource,
    /// RSA key pair generation failed.
    KeyGeneration,
    /// Key bytes did not parse as any supported encoding.
    MalformedKey,
    /// A well-formed key of the wrong kind (public vs private).
    KeyTypeMismatch,
    /// A key could not be serialized.
    KeyEncoding,
    /// A key file could not be read or written.
    Io,
    WrappingFailed,
    UnwrappingFailed,
    /// The AEAD cipher refused to encrypt.
    Encryption,
    /// Envelope tag did not verify.
    Authentication,
    MalformedEnvelope,
    MalformedUnit,
    /// The signer's provider failed for a reason other than entropy.
    Signing,
}

/// Any error from the keyseal protocol layers.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Wrap(#[from] KeyWrapError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::Key(e) => match e {
                KeyError::EntropySource => ErrorKind::EntropySource,
                KeyError::KeyGeneration(_) => ErrorKind::KeyGeneration,
                KeyError::MalformedKey => ErrorKind::MalformedKey,
                KeyError::KeyTypeMismatch { .. } => ErrorKind::KeyTypeMismatch,
                KeyError::Encoding => ErrorKind::KeyEncoding,
                KeyError::Io(_) => ErrorKind::Io,
            },
            ProtocolError::Wrap(e) => match e {
                KeyWrapError::KeyTooLarge { .. } | KeyWrapError::Wrapping => {
                    ErrorKind::WrappingFailed
                }
                KeyWrapError::Unwrapping => ErrorKind::UnwrappingFailed,
            },
            ProtocolError::Envelope(e) => envelope_kind(e),
            ProtocolError::Signing(e) => match e {
                SigningError::EntropySource => ErrorKind::EntropySource,
                SigningError::SigningFailed => ErrorKind::Signing,
                SigningError::MalformedUnit { .. } => ErrorKind::MalformedUnit,
                SigningError::Envelope(e) => envelope_kind(e),
            },
        }
    }
}

fn envelope_kind(e: &EnvelopeError) -> ErrorKind {
    match e {
        EnvelopeError::EntropySource => ErrorKind::EntropySource,
        EnvelopeError::Encryption => ErrorKind::Encryption,
        EnvelopeError::Authentication => ErrorKind::Authentication,
        EnvelopeError::MalformedEnvelope { .. } => ErrorKind::MalformedEnvelope,
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
