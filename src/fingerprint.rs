use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Digest size of the fingerprint hash in bytes
pub const DIGEST_SIZE: usize = 32;

/// Printable SHA-256 fingerprint of an input, used as the answer table key.
///
/// The digest is rendered with standard padded base64, so a fingerprint is
/// always 44 characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already rendered fingerprint (e.g. from a generated table)
    pub fn from_rendered(rendered: impl Into<String>) -> Self {
        Self(rendered.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex form of the raw digest, or None if the rendering is not valid base64
    pub fn to_hex(&self) -> Option<String> {
        STANDARD.decode(&self.0).ok().map(hex::encode)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw SHA-256 digest over the exact UTF-8 bytes of the input
pub fn digest(input: &str) -> [u8; DIGEST_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher.finalize().into()
}

/// Fingerprint an input. Total: every string, including "", has one.
/// Trailing terminators are part of the input and change the key.
pub fn fingerprint(input: &str) -> Fingerprint {
    Fingerprint(STANDARD.encode(digest(input)))
}
