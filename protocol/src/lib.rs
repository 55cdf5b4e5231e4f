// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # keyseal Protocol — Core Library
//!
//! Hybrid file encryption with origin authentication between two parties who
//! already hold each other's RSA public keys.
//!
//! A message goes out as two blobs: a *transmission unit*
//! (`nonce || tag || ciphertext || signature`) and a *wrapped key* (the
//! single-use AES-256 key, RSA-OAEP encrypted for the recipient). The
//! recipient unwraps the key, opens the envelope, and checks the signature
//! over what came out.
//!
//! ## Architecture
//!
//! - **crypto** — Key material, key wrapping, the AEAD envelope, signatures.
//!   All primitives go through one [`crypto::CryptoProvider`].
//! - **exchange** — `send` and `receive`, the full flow for one message.
//! - **error** — One error type over every layer, with a stable [`ErrorKind`].
//! - **config** — Sizes and algorithm parameters of the wire format.
//!
//! ## Design Philosophy
//!
//! 1. No global state. Every operation is a function of its arguments and
//!    the random source.
//! 2. Authentication failures don't say why.
//! 3. Secrets are zeroized on drop and never logged.
//! 4. Fixed sizes, fixed offsets. Key sizes are not a runtime option.

pub mod config;
pub mod crypto;
pub mod error;
pub mod exchange;

pub use error::{ErrorKind, ProtocolError, Result};
pub use exchange::{receive, send, OutboundMessage, Verdict};
