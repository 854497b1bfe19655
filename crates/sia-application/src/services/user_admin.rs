//! User account administration
//!
//! Creation, profile updates, role reassignment and logical deletion.
//! Role reassignment produces its own audit event in addition to the
//! general update event, and synchronously invalidates the user's
//! cached permission resolution.

use crate::services::audit::AuditService;
use crate::services::resolver::PermissionResolver;
use serde_json::json;
use sia_domain::constants::MODULE_USUARIOS;
use sia_domain::entities::User;
use sia_domain::error::{Error, Result};
use sia_domain::ports::{CredentialHasher, RoleStore, UserStore};
use sia_domain::value_objects::RequestContext;
use std::sync::Arc;
use tracing::info;

/// Payload for account creation
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    /// National id or carnet; may be empty, unique when present
    pub identification: String,
    /// Plaintext credential, digested before it reaches any store
    pub plaintext: String,
    pub role_id: i64,
}

/// Payload for profile updates. The credential is never updated through
/// this path.
#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub full_name: String,
    pub email: String,
    pub identification: String,
    pub role_id: i64,
}

/// User administration service
pub struct UserAdminService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    hasher: Arc<dyn CredentialHasher>,
    resolver: Arc<PermissionResolver>,
    audit: Arc<AuditService>,
}

impl UserAdminService {
    /// Create the service with its injected collaborators
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        hasher: Arc<dyn CredentialHasher>,
        resolver: Arc<PermissionResolver>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            users,
            roles,
            hasher,
            resolver,
            audit,
        }
    }

    fn check_profile(full_name: &str, email: &str) -> Result<()> {
        if full_name.trim().is_empty() {
            return Err(Error::validation("El nombre completo es obligatorio"));
        }
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::validation("Correo no válido"));
        }
        Ok(())
    }

    /// Create an account. The store's uniqueness checks on email and
    /// identification are the authority; a pre-check here would only
    /// narrow the race window, so there is none.
    pub async fn create_user(
        &self,
        request: CreateUserRequest,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<User> {
        Self::check_profile(&request.full_name, &request.email)?;
        if request.plaintext.is_empty() {
            return Err(Error::validation("La contraseña es obligatoria"));
        }
        let role = self
            .roles
            .find_by_id(request.role_id)
            .await?
            .ok_or_else(|| Error::not_found("rol", request.role_id))?;
        if !role.active {
            return Err(Error::not_found("rol", request.role_id));
        }

        let user = User::new(
            request.full_name.trim(),
            request.email.trim(),
            self.hasher.hash(&request.plaintext),
            request.identification.trim(),
            request.role_id,
        );
        let user = self.users.insert(user).await?;
        info!(user_id = user.id, "user created");

        self.audit
            .record_creation(
                actor_id,
                MODULE_USUARIOS,
                "Usuario",
                user.id,
                format!("Se creó el usuario {}", user.full_name),
                Some(json!({
                    "NombreCompleto": user.full_name,
                    "Correo": user.email,
                    "RolId": user.role_id,
                })),
                ctx,
            )
            .await;
        Ok(user)
    }

    /// Update profile fields and, possibly, the role. A role change
    /// emits its own audit event before the general update event and
    /// drops the user's cached resolution.
    pub async fn update_user(
        &self,
        user_id: i64,
        request: UpdateUserRequest,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<()> {
        Self::check_profile(&request.full_name, &request.email)?;
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found("usuario", user_id))?;
        let role = self
            .roles
            .find_by_id(request.role_id)
            .await?
            .ok_or_else(|| Error::not_found("rol", request.role_id))?;
        if !role.active {
            return Err(Error::not_found("rol", request.role_id));
        }

        let before = json!({
            "NombreCompleto": user.full_name,
            "Correo": user.email,
            "RolId": user.role_id,
            "Identificacion": user.identification,
        });
        // Role names are resolved before the mutation so the change
        // event reads them from a consistent snapshot.
        let role_changed = user.role_id != request.role_id;
        let old_role_name = if role_changed {
            self.roles
                .find_by_id(user.role_id)
                .await?
                .map(|r| r.name)
        } else {
            None
        };

        user.full_name = request.full_name.trim().to_owned();
        user.email = request.email.trim().to_owned();
        user.identification = request.identification.trim().to_owned();
        user.role_id = request.role_id;
        self.users.update(&user).await?;

        if role_changed {
            self.resolver.invalidate_user(user_id);
            info!(user_id, role_id = request.role_id, "user role changed");
            self.audit
                .record_role_change(
                    actor_id,
                    user_id,
                    old_role_name.as_deref(),
                    Some(role.name.as_str()),
                    ctx,
                )
                .await;
        }

        self.audit
            .record_update(
                actor_id,
                MODULE_USUARIOS,
                "Usuario",
                user_id,
                format!("Se actualizó el usuario {}", user.full_name),
                Some(before),
                Some(json!({
                    "NombreCompleto": user.full_name,
                    "Correo": user.email,
                    "RolId": user.role_id,
                })),
                ctx,
            )
            .await;
        Ok(())
    }

    /// Logical deletion. The record stays for audit joins; the user can
    /// no longer authenticate and resolves to no permissions.
    pub async fn deactivate_user(
        &self,
        user_id: i64,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found("usuario", user_id))?;

        let before = json!({
            "NombreCompleto": user.full_name,
            "Correo": user.email,
            "RolId": user.role_id,
        });
        self.users.set_active(user_id, false).await?;
        self.resolver.invalidate_user(user_id);
        info!(user_id, "user deactivated");

        self.audit
            .record_deletion(
                actor_id,
                MODULE_USUARIOS,
                "Usuario",
                user_id,
                format!("Se eliminó el usuario {}", user.full_name),
                Some(before),
                ctx,
            )
            .await;
        Ok(())
    }

    /// Active accounts
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.list_active().await
    }

    /// One account by id
    pub async fn find_user(&self, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found("usuario", user_id))
    }
}
