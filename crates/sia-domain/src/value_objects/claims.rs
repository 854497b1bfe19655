//! Bearer-token claims

use crate::error::{Error, Result};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoded payload of a bearer token. Self-contained: everything an
/// authorization gate needs short of the live permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject, the user id rendered as a string
    pub sub: String,
    /// User email
    pub email: String,
    /// User display name
    pub name: String,
    /// Role name at issuance time
    pub role: String,
    /// Role id at issuance time
    pub role_id: i64,
    /// Unique token identifier
    pub jti: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch, strictly after `iat`
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

impl TokenClaims {
    /// Build claims for a user, stamped now and expiring after
    /// `expiry_minutes`. The jti is a fresh UUID v4.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: i64,
        email: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        role_id: i64,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiry_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            email: email.into(),
            name: name.into(),
            role: role.into(),
            role_id,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expiry_minutes)).timestamp(),
            iss: issuer.into(),
            aud: audience.into(),
        }
    }

    /// Subject parsed back to the user id
    pub fn subject_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| Error::token(format!("non-numeric subject: {}", self.sub)))
    }

    /// True once the expiry has passed
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}

/// An encoded token together with the claims it carries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Compact encoded form, what the client presents back
    pub token: String,
    /// The claims baked into `token`
    pub claims: TokenClaims,
}
