//! Password source for the client-side calendar gate.
//!
//! The password is looked up in an environment variable first, then in a
//! sibling file. Either source may hold the plaintext or a pre-hashed value
//! tagged `sha256:`; only the SHA-256 hex digest ever leaves this module,
//! so the plaintext cannot end up in the rendered document.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Environment variable consulted first.
pub const PASSWORD_ENV: &str = "CALENDAR_PASSWORD";

/// Default sibling file consulted when the environment variable is unset.
pub const PASSWORD_FILE: &str = "calendar_password.txt";

/// Prefix marking an already-hashed password value.
pub const HASH_PREFIX: &str = "sha256:";

/// SHA-256 hex digest of a string.
#[must_use]
pub fn sha256_hex(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Normalize a raw password value to its hash, honoring the `sha256:`
/// prefix. Blank values disable the gate (`None`).
#[must_use]
pub fn normalize_password(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(hashed) = value.strip_prefix(HASH_PREFIX) {
        let hashed = hashed.trim();
        if hashed.is_empty() {
            return None;
        }
        return Some(hashed.to_string());
    }
    Some(sha256_hex(value))
}

/// Resolve the password hash: environment variable first, then the given
/// file. Returns `None` (gate disabled) when neither holds a value.
#[must_use]
pub fn load_password_hash(env_var: &str, file: &Path) -> Option<String> {
    let mut raw = std::env::var(env_var).unwrap_or_default();
    if raw.trim().is_empty() {
        raw = fs::read_to_string(file).unwrap_or_default();
    }
    let hash = normalize_password(&raw);
    if hash.is_some() {
        log::info!("Password gate enabled");
    } else {
        log::debug!("No password configured; gate disabled");
    }
    hash
}
