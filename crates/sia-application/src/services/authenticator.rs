//! Credential verification and token issuance
//!
//! Each authentication attempt is one atomic decision: verify, then
//! either reject or hand back the user and (for the login flow) a signed
//! bearer token. Nothing pending is ever persisted.
//!
//! The three rejection causes (unknown email, inactive account, digest
//! mismatch) collapse into one `InvalidCredentials` so responses cannot
//! be used to enumerate accounts; the split survives only in logs.

use crate::services::audit::AuditService;
use crate::services::resolver::PermissionResolver;
use chrono::Utc;
use serde::Serialize;
use sia_domain::entities::User;
use sia_domain::error::{Error, Result};
use sia_domain::ports::{CredentialHasher, RoleStore, TokenIssuer, UserStore};
use sia_domain::value_objects::{IssuedToken, RequestContext, TokenClaims};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the login flow returns to the transport layer
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    /// The authenticated identity
    pub user: UserSummary,
    /// Bearer token and its claims
    pub token: IssuedToken,
    /// Effective permission names, sorted
    pub permissions: Vec<String>,
}

/// Identity fields safe to hand outward; never carries the hash
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    /// User id
    pub id: i64,
    /// Display name
    pub full_name: String,
    /// Email
    pub email: String,
    /// Role id
    pub role_id: i64,
    /// Role name at login time
    pub role_name: String,
}

/// Authentication service
pub struct AuthService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    resolver: Arc<PermissionResolver>,
    audit: Arc<AuditService>,
}

impl AuthService {
    /// Create the service with its injected collaborators
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
        resolver: Arc<PermissionResolver>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            users,
            roles,
            hasher,
            tokens,
            resolver,
            audit,
        }
    }

    /// Verify a credential pair. On success the last-access timestamp is
    /// updated best-effort: a failed write is logged and the
    /// authentication stands.
    pub async fn authenticate(&self, email: &str, plaintext: &str) -> Result<User> {
        let Some(mut user) = self.users.find_by_email(email).await? else {
            debug!(email, "login refused: unknown email");
            return Err(Error::InvalidCredentials);
        };
        if !user.active {
            debug!(email, "login refused: inactive account");
            return Err(Error::InvalidCredentials);
        }
        if !self.hasher.verify(plaintext, &user.credential_hash) {
            debug!(email, "login refused: digest mismatch");
            return Err(Error::InvalidCredentials);
        }

        let now = Utc::now();
        match self.users.touch_last_access(user.id, now).await {
            Ok(()) => user.last_access = Some(now),
            Err(error) => warn!(%error, user_id = user.id, "last-access update failed"),
        }
        info!(user_id = user.id, "credentials verified");
        Ok(user)
    }

    /// Full login flow: authenticate, issue the token, resolve effective
    /// permissions, record the login event. The audit write follows
    /// token issuance and is best-effort; its failure never revokes the
    /// token.
    pub async fn login(
        &self,
        email: &str,
        plaintext: &str,
        ctx: &RequestContext,
    ) -> Result<LoginOutcome> {
        let user = self.authenticate(email, plaintext).await?;
        let role = self
            .roles
            .find_by_id(user.role_id)
            .await?
            .ok_or_else(|| Error::not_found("rol", user.role_id))?;

        let token = self.tokens.issue(&user, &role.name)?;
        let mut permissions: Vec<String> = self
            .resolver
            .resolve_effective_permissions(user.id)
            .await?
            .into_iter()
            .collect();
        permissions.sort();

        self.audit.record_login(user.id, &user.full_name, ctx).await;

        Ok(LoginOutcome {
            user: UserSummary {
                id: user.id,
                full_name: user.full_name,
                email: user.email,
                role_id: role.id,
                role_name: role.name,
            },
            token,
            permissions,
        })
    }

    /// Record the logout event for a known user
    pub async fn logout(&self, user_id: i64, ctx: &RequestContext) -> Result<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found("usuario", user_id))?;
        self.audit.record_logout(user.id, &user.full_name, ctx).await;
        Ok(())
    }

    /// Replace a credential after verifying the current one. False on
    /// missing user or mismatch, with no partial mutation; the actual
    /// replacement is a single-field store write.
    pub async fn change_credential(
        &self,
        user_id: i64,
        current_plaintext: &str,
        new_plaintext: &str,
    ) -> Result<bool> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(false);
        };
        if !self.hasher.verify(current_plaintext, &user.credential_hash) {
            debug!(user_id, "credential change refused: digest mismatch");
            return Ok(false);
        }
        let digest = self.hasher.hash(new_plaintext);
        self.users.update_credential(user_id, &digest).await?;
        info!(user_id, "credential replaced");
        Ok(true)
    }

    /// Digest a plaintext credential with the configured scheme
    pub fn hash(&self, plaintext: &str) -> String {
        self.hasher.hash(plaintext)
    }

    /// Verify a presented bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims> {
        self.tokens.verify(token)
    }
}
