//! Cryptographic services module
//!
//! Credential digesting for the authenticator. Token signing lives in
//! `crate::auth` next to its configuration.

mod digest;

pub use digest::Sha256CredentialHasher;
