//! Provider ports
//!
//! Contracts for the cryptographic collaborators. The traits live here
//! and the implementations in the infrastructure layer, so the
//! application services depend only on the abstraction.

use crate::entities::User;
use crate::error::Result;
use crate::value_objects::{IssuedToken, TokenClaims};

/// Credential digest provider.
///
/// The contract is a deterministic one-way digest: the same plaintext
/// always produces the same digest, and the digest is not invertible in
/// practice. Determinism is what makes comparison-based verification
/// work; a randomized scheme needs a different verify path behind this
/// same trait.
pub trait CredentialHasher: Send + Sync {
    /// Digest a plaintext credential
    fn hash(&self, plaintext: &str) -> String;

    /// Compare a plaintext against a stored digest without leaking the
    /// comparison through timing
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Bearer-token provider.
///
/// Tokens are self-contained: verification needs the server-held secret
/// and nothing else, no stored session. Nothing is persisted at
/// issuance.
pub trait TokenIssuer: Send + Sync {
    /// Issue a signed token for an authenticated user
    fn issue(&self, user: &User, role_name: &str) -> Result<IssuedToken>;

    /// Verify signature, expiry, issuer, and audience, returning the
    /// embedded claims
    fn verify(&self, token: &str) -> Result<TokenClaims>;
}
