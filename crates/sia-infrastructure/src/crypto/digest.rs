//! Credential digest service using SHA-256

use sha2::{Digest, Sha256};
use sia_domain::ports::CredentialHasher;

/// Deterministic SHA-256 credential digest, rendered as lowercase hex.
///
/// The digest is unsalted so that equal inputs produce equal stored
/// values; verification recomputes the digest and compares it against
/// the stored one in constant time.
#[derive(Debug, Clone, Default)]
pub struct Sha256CredentialHasher;

impl Sha256CredentialHasher {
    /// Create the digest service
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Sha256CredentialHasher {
    fn hash(&self, plaintext: &str) -> String {
        let digest = Sha256::digest(plaintext.as_bytes());
        hex::encode(digest)
    }

    fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        constant_time_eq(self.hash(plaintext).as_bytes(), stored_hash.as_bytes())
    }
}

/// Constant-time comparison for cryptographic values
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
