// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # keyseal
//!
//! Entry point for the `keyseal` binary. Parses CLI arguments, initializes
//! logging, and runs one protocol operation against files on disk.
//!
//! - `keygen`  — generate an identity key pair
//! - `encrypt` — sign, seal, and wrap the message key for a recipient
//! - `decrypt` — unwrap, open, and verify; write plaintext only if accepted
//! - `inspect` — print a key summary as JSON
//! - `version` — print build version information

mod cli;
mod logging;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use keyseal_protocol::config::{
    ASYMMETRIC_ALGORITHM, HASH_FUNCTION, RSA_KEY_BITS, SYMMETRIC_ALGORITHM,
};
use keyseal_protocol::crypto::keys::{
    generate_asymmetric_key_pair, load_key, save_key, AsymmetricKey, KeyInfo, KeyKind,
    PrivateKey, PublicKey,
};
use keyseal_protocol::crypto::wrapping::WrappedKey;
use keyseal_protocol::exchange::{self, Verdict};

use cli::{Commands, KeysealCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = KeysealCli::parse();
    logging::init_logging(
        "keyseal=info,keyseal_protocol=warn",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::Keygen(args) => keygen(args),
        Commands::Encrypt(args) => encrypt(args),
        Commands::Decrypt(args) => decrypt(args),
        Commands::Inspect(args) => inspect(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Generates a key pair and writes `<name>_private.pem` / `<name>_public.pem`.
fn keygen(args: cli::KeygenArgs) -> Result<()> {
    let dir = &args.key_dir;
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create key directory: {}", dir.display()))?;

    let private_path = dir.join(format!("{}_private.pem", args.name));
    let public_path = dir.join(format!("{}_public.pem", args.name));
    if !args.force {
        for path in [&private_path, &public_path] {
            if path.exists() {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
        }
    }

    tracing::info!(name = %args.name, bits = RSA_KEY_BITS, "generating key pair");
    let (private, public) = generate_asymmetric_key_pair()
        .context("key generation failed")?
        .into_parts();
    let fingerprint = public.fingerprint().context("failed to fingerprint public key")?;

    save_key(&private_path, &AsymmetricKey::from(private))
        .with_context(|| format!("failed to write {}", private_path.display()))?;
    save_key(&public_path, &AsymmetricKey::from(public))
        .with_context(|| format!("failed to write {}", public_path.display()))?;

    tracing::info!(
        private_key = %private_path.display(),
        public_key = %public_path.display(),
        "key pair written"
    );

    println!("Key pair generated.");
    println!("  Private key : {}", private_path.display());
    println!("  Public key  : {}", public_path.display());
    println!("  Fingerprint : {}", fingerprint);
    Ok(())
}

/// Signs and encrypts `input`, writing the unit and the wrapped message key.
fn encrypt(args: cli::EncryptArgs) -> Result<()> {
    let plaintext = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let signer = read_private(&args.signer)?;
    let recipient = read_public(&args.recipient)?;

    let message = exchange::send(&plaintext, &signer, &recipient)
        .with_context(|| format!("failed to encrypt {}", args.input.display()))?;

    fs::write(&args.output, message.unit.as_bytes())
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    fs::write(&args.key_out, message.wrapped_key.as_bytes())
        .with_context(|| format!("failed to write {}", args.key_out.display()))?;

    tracing::info!(
        input = %args.input.display(),
        unit = %args.output.display(),
        unit_len = message.unit.len(),
        "file encrypted"
    );
    Ok(())
}

/// Decrypts a unit and writes the plaintext if the signature verifies.
fn decrypt(args: cli::DecryptArgs) -> Result<()> {
    let unit = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let wrapped = WrappedKey::from_bytes(
        fs::read(&args.key_file)
            .with_context(|| format!("failed to read {}", args.key_file.display()))?,
    );
    let recipient = read_private(&args.recipient)?;
    let signer = read_public(&args.signer)?;

    let verdict = exchange::receive(&wrapped, &unit, &recipient, &signer)
        .with_context(|| format!("failed to decrypt {}", args.input.display()))?;

    match verdict {
        Verdict::Accepted(plaintext) => {
            fs::write(&args.output, &plaintext)
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            tracing::info!(
                output = %args.output.display(),
                plaintext_len = plaintext.len(),
                "signature verified, plaintext written"
            );
            Ok(())
        }
        Verdict::Rejected => bail!(
            "signature verification failed for {}; plaintext not written",
            args.input.display()
        ),
    }
}

#[derive(Serialize)]
struct InspectReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    info: KeyInfo,
}

/// Prints a JSON summary of a PEM key.
fn inspect(args: cli::InspectArgs) -> Result<()> {
    let kind = if args.private {
        KeyKind::Private
    } else {
        KeyKind::Public
    };
    let key = load_key(&args.key, kind)
        .with_context(|| format!("failed to load {} key from {}", kind, args.key.display()))?;
    let report = InspectReport {
        path: &args.key,
        info: key.info().context("failed to summarize key")?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_private(path: &Path) -> Result<PrivateKey> {
    load_key(path, KeyKind::Private)
        .with_context(|| format!("failed to load private key from {}", path.display()))?
        .into_private()
        .context("loaded key is not a private key")
}

fn read_public(path: &Path) -> Result<PublicKey> {
    load_key(path, KeyKind::Public)
        .with_context(|| format!("failed to load public key from {}", path.display()))?
        .into_public()
        .context("loaded key is not a public key")
}

/// Prints version information to stdout.
fn print_version() {
    println!("keyseal    {}", env!("CARGO_PKG_VERSION"));
    println!(
        "algorithms {}-{} OAEP/PSS, {}, {}",
        ASYMMETRIC_ALGORITHM, RSA_KEY_BITS, SYMMETRIC_ALGORITHM, HASH_FUNCTION
    );
}
