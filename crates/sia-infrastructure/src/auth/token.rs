//! JWT token issuance and verification

use crate::config::JwtConfig;
use crate::constants::JWT_MIN_SECRET_LEN;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sia_domain::entities::User;
use sia_domain::error::{Error, Result};
use sia_domain::ports::TokenIssuer;
use sia_domain::value_objects::{IssuedToken, TokenClaims};

/// HS256-signed bearer tokens carrying the session claims.
///
/// Verification enforces signature, expiry, issuer and audience; any
/// rejection reason collapses into a single token error so callers
/// cannot probe which check failed.
#[derive(Debug)]
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    expiry_minutes: i64,
}

impl JwtTokenIssuer {
    /// Build the issuer from configuration. Refuses a missing or weak
    /// secret so a misconfigured deployment fails at startup, not at
    /// the first login.
    pub fn new(config: &JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(Error::configuration(
                "auth.jwt.secret is required to issue tokens",
            ));
        }
        if config.secret.len() < JWT_MIN_SECRET_LEN {
            return Err(Error::configuration(
                "auth.jwt.secret must be at least 32 bytes long",
            ));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expiry_minutes: config.expiry_minutes,
        })
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User, role_name: &str) -> Result<IssuedToken> {
        let claims = TokenClaims::new(
            user.id,
            user.email.clone(),
            user.full_name.clone(),
            role_name,
            user.role_id,
            self.issuer.clone(),
            self.audience.clone(),
            self.expiry_minutes,
        );

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::token_with_source("Token generation failed", e))?;

        Ok(IssuedToken { token, claims })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| Error::token_with_source("Invalid token", e))?;

        Ok(token_data.claims)
    }
}
