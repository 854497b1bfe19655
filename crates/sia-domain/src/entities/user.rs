//! User identity entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity record. Owns its credential hash exclusively; no other
/// component reads or writes the hash except through the authenticator.
///
/// Email and identification are unique across active AND inactive users.
/// Deactivation is the only deletion path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned id
    pub id: i64,
    /// Display name
    pub full_name: String,
    /// Unique email, the login key
    pub email: String,
    /// Opaque credential digest, never the plaintext
    pub credential_hash: String,
    /// Unique external identification (cédula / student card)
    pub identification: String,
    /// Role reference
    pub role_id: i64,
    /// Soft-delete flag
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last successful authentication, best-effort telemetry
    pub last_access: Option<DateTime<Utc>>,
}

impl User {
    /// Build a user ready for insertion (id assigned by the store)
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        credential_hash: impl Into<String>,
        identification: impl Into<String>,
        role_id: i64,
    ) -> Self {
        Self {
            id: 0,
            full_name: full_name.into(),
            email: email.into(),
            credential_hash: credential_hash.into(),
            identification: identification.into(),
            role_id,
            active: true,
            created_at: Utc::now(),
            last_access: None,
        }
    }
}
