//! # CLI Interface
//!
//! Command-line arguments for `keyseal`, via `clap` derive. Five
//! subcommands: `keygen`, `encrypt`, `decrypt`, `inspect`, and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sign-and-seal files between holders of RSA key pairs.
///
/// `encrypt` produces two files: the transmission unit (ciphertext plus
/// signature) and the encrypted message key. The recipient needs both,
/// plus the sender's public key, to `decrypt`.
#[derive(Parser, Debug)]
#[command(
    name = "keyseal",
    about = "Hybrid RSA/AES-GCM file encryption with signatures",
    version,
    propagate_version = true
)]
pub struct KeysealCli {
    /// Log format: "pretty" or "json". Logs go to stderr.
    #[arg(long, global = true, env = "KEYSEAL_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an RSA-2048 key pair and write both halves as PEM.
    Keygen(KeygenArgs),
    /// Sign a file, encrypt it, and wrap the message key for a recipient.
    Encrypt(EncryptArgs),
    /// Decrypt a transmission unit and verify its signature.
    Decrypt(DecryptArgs),
    /// Print a key's type, size and fingerprint as JSON.
    Inspect(InspectArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for `keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Identity name. Files are written as `<name>_private.pem` and
    /// `<name>_public.pem`.
    #[arg(long, short = 'n')]
    pub name: String,

    /// Directory to write the key files into. Created if missing.
    #[arg(long, short = 'd', env = "KEYSEAL_KEY_DIR", default_value = ".")]
    pub key_dir: PathBuf,

    /// Overwrite existing key files.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `encrypt`.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// File to encrypt.
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Recipient's public key (PEM).
    #[arg(long, short = 'r')]
    pub recipient: PathBuf,

    /// Sender's private key (PEM), used to sign.
    #[arg(long, short = 's')]
    pub signer: PathBuf,

    /// Where to write the transmission unit.
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Where to write the encrypted message key.
    #[arg(long, short = 'k')]
    pub key_out: PathBuf,
}

/// Arguments for `decrypt`.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Transmission unit to decrypt.
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Encrypted message key produced alongside the unit.
    #[arg(long, short = 'k')]
    pub key_file: PathBuf,

    /// Recipient's private key (PEM).
    #[arg(long, short = 'r')]
    pub recipient: PathBuf,

    /// Sender's public key (PEM), used to verify.
    #[arg(long, short = 's')]
    pub signer: PathBuf,

    /// Where to write the plaintext. Only written if the signature verifies.
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

/// Arguments for `inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PEM key file.
    #[arg(long)]
    pub key: PathBuf,

    /// Expect a private key instead of a public one.
    #[arg(long)]
    pub private: bool,
}
