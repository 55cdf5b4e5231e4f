//! Terminal walkthrough of a keyseal exchange between two users.
//!
//! Generates two identities, writes their PEM files to a temporary
//! directory, sends a file from user 1 to user 2, and then shows what
//! happens when the unit is tampered with or attributed to the wrong signer.
//!
//! Run with:
//!   cargo run --example demo --release

use std::time::Instant;

use keyseal_protocol::config::{ENVELOPE_HEADER_LENGTH, SIGNATURE_LENGTH};
use keyseal_protocol::crypto::keys::{
    generate_asymmetric_key_pair, load_key, save_key, AsymmetricKey, KeyKind, PrivateKey,
};
use keyseal_protocol::crypto::wrapping::WrappedKey;
use keyseal_protocol::exchange::{receive, send, Verdict};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!("{BG_BLUE}{BOLD}{WHITE}                                                              {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    KEYSEAL  --  Two-User Exchange Demo                       {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    RSA-2048 OAEP/PSS + AES-256-GCM + SHA-256                 {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}                                                              {RESET}");
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]================================================{RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!("{CYAN}--------------------------------------------------------------{RESET}");
}

fn subsection(text: &str) {
    println!("{DIM}{CYAN}  >> {text}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn failure(text: &str) {
    println!("{RED}  [REJECTED] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.2} ms]{RESET}");
}

fn identity_row(name: &str, fingerprint: &str, color: &str) {
    println!(
        "  {color}{BOLD}{name:<8}{RESET}  {DIM}sha256:{}...{RESET}",
        &fingerprint[..16]
    );
}

fn load_private(path: &std::path::Path) -> PrivateKey {
    load_key(path, KeyKind::Private)
        .expect("load private key")
        .into_private()
        .expect("private key")
}

fn load_public(path: &std::path::Path) -> keyseal_protocol::crypto::keys::PublicKey {
    load_key(path, KeyKind::Public)
        .expect("load public key")
        .into_public()
        .expect("public key")
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let demo_start = Instant::now();
    banner();

    // -----------------------------------------------------------------------
    // Step 1: Identities
    // -----------------------------------------------------------------------

    section(1, "Identity Generation");
    subsection("Generating two RSA-2048 key pairs (e = 65537)...");

    let t = Instant::now();
    let user1 = generate_asymmetric_key_pair().expect("keygen");
    let user2 = generate_asymmetric_key_pair().expect("keygen");
    timing("keygen x2", t.elapsed());

    println!();
    identity_row("user1", &user1.public_key().fingerprint().expect("fingerprint"), BLUE);
    identity_row("user2", &user2.public_key().fingerprint().expect("fingerprint"), GREEN);

    // -----------------------------------------------------------------------
    // Step 2: Keys on disk
    // -----------------------------------------------------------------------

    section(2, "PEM Files");
    let dir = tempfile::tempdir().expect("temp dir");
    info("Key directory", &dir.path().display().to_string());

    let (user1_private, user1_public) = user1.into_parts();
    let (user2_private, user2_public) = user2.into_parts();
    for (name, key) in [
        ("user1_private.pem", AsymmetricKey::from(user1_private)),
        ("user1_public.pem", AsymmetricKey::from(user1_public)),
        ("user2_private.pem", AsymmetricKey::from(user2_private)),
        ("user2_public.pem", AsymmetricKey::from(user2_public)),
    ] {
        save_key(&dir.path().join(name), &key).expect("save key");
        info("Wrote", &format!("{name} ({})", key.kind()));
    }
    success("Private keys are PKCS#1, public keys SubjectPublicKeyInfo");

    // -----------------------------------------------------------------------
    // Step 3: Send
    // -----------------------------------------------------------------------

    section(3, "user1 -> user2");
    let plaintext =
        b"Minutes of the March board meeting. Circulate to directors only.".to_vec();
    info("Plaintext", &String::from_utf8_lossy(&plaintext));

    subsection("Signing, sealing under a fresh AES key, wrapping the key for user2...");
    let signer = load_private(&dir.path().join("user1_private.pem"));
    let recipient_pub = load_public(&dir.path().join("user2_public.pem"));

    let t = Instant::now();
    let msg = send(&plaintext, &signer, &recipient_pub).expect("send");
    timing("send", t.elapsed());

    info(
        "Transmission unit",
        &format!(
            "{} bytes = {ENVELOPE_HEADER_LENGTH} header + {} ciphertext + {SIGNATURE_LENGTH} signature",
            msg.unit.len(),
            msg.unit.len() - ENVELOPE_HEADER_LENGTH - SIGNATURE_LENGTH
        ),
    );
    info("Wrapped key", &format!("{} bytes", msg.wrapped_key.len()));

    // -----------------------------------------------------------------------
    // Step 4: Receive
    // -----------------------------------------------------------------------

    section(4, "user2 opens the message");
    let recipient = load_private(&dir.path().join("user2_private.pem"));
    let signer_pub = load_public(&dir.path().join("user1_public.pem"));

    let t = Instant::now();
    let verdict = receive(&msg.wrapped_key, msg.unit.as_bytes(), &recipient, &signer_pub)
        .expect("receive");
    timing("receive", t.elapsed());

    match verdict {
        Verdict::Accepted(recovered) => {
            assert_eq!(recovered, plaintext);
            info("Recovered", &String::from_utf8_lossy(&recovered));
            success("Signature verified against user1's public key");
        }
        Verdict::Rejected => failure("signature did not verify"),
    }

    // -----------------------------------------------------------------------
    // Step 5: Things that should fail
    // -----------------------------------------------------------------------

    section(5, "Tampering & Misattribution");

    subsection("Flipping one ciphertext bit...");
    let mut tampered = msg.unit.as_bytes().to_vec();
    tampered[ENVELOPE_HEADER_LENGTH] ^= 0x01;
    match receive(&msg.wrapped_key, &tampered, &recipient, &signer_pub) {
        Err(e) => failure(&format!("{e} ({:?})", e.kind())),
        Ok(_) => println!("{RED}  unexpected: tampered unit opened{RESET}"),
    }

    subsection("Claiming the message came from user2...");
    let wrong_signer = load_public(&dir.path().join("user2_public.pem"));
    match receive(&msg.wrapped_key, msg.unit.as_bytes(), &recipient, &wrong_signer) {
        Ok(Verdict::Rejected) => failure("decrypted, but signature does not match user2"),
        other => println!("{RED}  unexpected: {other:?}{RESET}"),
    }

    subsection("Handing user1 the key meant for user2...");
    let user1_private = load_private(&dir.path().join("user1_private.pem"));
    let wrapped = WrappedKey::from_bytes(msg.wrapped_key.as_bytes().to_vec());
    match receive(&wrapped, msg.unit.as_bytes(), &user1_private, &signer_pub) {
        Err(e) => failure(&format!("{e} ({:?})", e.kind())),
        Ok(_) => println!("{RED}  unexpected: wrong recipient unwrapped the key{RESET}"),
    }

    println!();
    timing("total demo", demo_start.elapsed());
    println!();
}
