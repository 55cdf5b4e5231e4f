//! # Two-Party Exchange
//!
//! The whole protocol for one message, both ends.
//!
//! Sender: sign the plaintext, seal it under a fresh message key, append the
//! signature, and wrap the message key for the recipient.
//!
//! Receiver: unwrap the message key, split the unit, open the envelope, then
//! verify the signature over the recovered plaintext.
//!
//! ## Ordering
//!
//! Signing happens before encryption and covers the plaintext, so the
//! receiver must decrypt before it can check the signature. Keep it that way:
//! existing units on disk were produced like this. A unit whose signature
//! fails still authenticated under GCM, which is why that case is a
//! [`Verdict::Rejected`] and not an error.
//!
//! ## Replay
//!
//! Nothing here binds a unit to a recipient, a time, or a session. A captured
//! unit plus its wrapped key will be accepted again, verbatim. Callers that
//! care about replay must track message identity themselves.

use tracing::{debug, info, warn};

use crate::crypto::envelope::{open_envelope, seal};
use crate::crypto::keys::{PrivateKey, PublicKey, SymmetricKey};
use crate::crypto::signing::{compose, decompose, sign, verify, TransmissionUnit};
use crate::crypto::wrapping::{unwrap, wrap, WrappedKey};
use crate::error::Result;

/// What a sender hands over: the unit and the key that opens it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub wrapped_key: WrappedKey,
    pub unit: TransmissionUnit,
}

/// Outcome of receiving a unit that decrypted successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Signature verified. The plaintext is authentic.
    Accepted(Vec<u8>),
    /// Decrypted, but the signature doesn't match the claimed signer. The
    /// plaintext is withheld.
    Rejected,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    /// The plaintext, if accepted.
    pub fn into_plaintext(self) -> Option<Vec<u8>> {
        match self {
            Verdict::Accepted(p) => Some(p),
            Verdict::Rejected => None,
        }
    }
}

/// Produce an [`OutboundMessage`] carrying `plaintext` from `signer` to
/// `recipient`. A new message key is generated for every call.
pub fn send(plaintext: &[u8], signer: &PrivateKey, recipient: &PublicKey) -> Result<OutboundMessage> {
    let signature = sign(plaintext, signer)?;
    let message_key = SymmetricKey::generate()?;
    let envelope = seal(plaintext, &message_key)?;
    let unit = compose(&envelope, &signature);
    let wrapped_key = wrap(&message_key, recipient)?;

    debug!(
        unit_len = unit.len(),
        recipient = %short_fingerprint(recipient),
        "message composed"
    );
    Ok(OutboundMessage { wrapped_key, unit })
}

/// Open `unit` with the message key in `wrapped_key` and check that
/// `signer` signed it.
///
/// Errors mean the unit or key never decrypted (wrong recipient, tampering,
/// truncation). A bad signature on a unit that did decrypt is
/// `Ok(Verdict::Rejected)`.
pub fn receive(
    wrapped_key: &WrappedKey,
    unit: &[u8],
    recipient: &PrivateKey,
    signer: &PublicKey,
) -> Result<Verdict> {
    let message_key = unwrap(wrapped_key, recipient)?;
    let (envelope, signature) = decompose(unit, signer.signature_len())?;
    let plaintext = open_envelope(&envelope, &message_key)?;

    if verify(&plaintext, &signature, signer) {
        info!(
            plaintext_len = plaintext.len(),
            signer = %short_fingerprint(signer),
            "message accepted"
        );
        Ok(Verdict::Accepted(plaintext))
    } else {
        warn!(signer = %short_fingerprint(signer), "signature rejected, plaintext withheld");
        Ok(Verdict::Rejected)
    }
}

/// [`receive`] for an [`OutboundMessage`] still in memory.
pub fn receive_message(
    message: &OutboundMessage,
    recipient: &PrivateKey,
    signer: &PublicKey,
) -> Result<Verdict> {
    receive(&message.wrapped_key, message.unit.as_bytes(), recipient, signer)
}

fn short_fingerprint(key: &PublicKey) -> String {
    key.fingerprint()
        .map(|fp| fp[..16].to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
