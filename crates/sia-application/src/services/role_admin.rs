//! Role lifecycle and permission-set administration
//!
//! Every mutation here is atomic with respect to the role's permission
//! associations (the store commits role and set as one unit), and every
//! mutation synchronously drops the resolver cache entries computed from
//! the role before returning. The audit write comes last and is
//! best-effort.

use crate::services::audit::AuditService;
use crate::services::resolver::PermissionResolver;
use serde_json::json;
use sia_domain::constants::MODULE_USUARIOS;
use sia_domain::entities::{Permission, Role};
use sia_domain::error::{Error, Result};
use sia_domain::ports::{PermissionStore, RoleStore};
use sia_domain::value_objects::RequestContext;
use std::sync::Arc;
use tracing::info;

/// Creation/update payload for a role
#[derive(Debug, Clone)]
pub struct RoleRequest {
    /// Role name, unique among active roles
    pub name: String,
    /// Free-text description
    pub description: String,
    /// The FULL permission set; an update replaces, never merges
    pub permission_ids: Vec<i64>,
}

/// A role joined with its active permissions
#[derive(Debug, Clone)]
pub struct RoleDetail {
    /// The role
    pub role: Role,
    /// Permissions currently associated and active
    pub permissions: Vec<Permission>,
}

/// Role administration service
pub struct RoleAdminService {
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
    resolver: Arc<PermissionResolver>,
    audit: Arc<AuditService>,
}

impl RoleAdminService {
    /// Create the service with its injected collaborators
    pub fn new(
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        resolver: Arc<PermissionResolver>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            roles,
            permissions,
            resolver,
            audit,
        }
    }

    /// Normalize to sorted unique ids and verify each one exists
    async fn checked_permission_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
        let mut normalized = ids.to_vec();
        normalized.sort_unstable();
        normalized.dedup();

        let found = self.permissions.list_by_ids(&normalized).await?;
        if found.len() != normalized.len() {
            let known: Vec<i64> = found.iter().map(|p| p.id).collect();
            let missing = normalized
                .iter()
                .find(|id| !known.contains(id))
                .copied()
                .unwrap_or_default();
            return Err(Error::not_found("permiso", missing));
        }
        Ok(normalized)
    }

    /// Create a role with its permission set in one unit. The store's
    /// uniqueness check is the authority on duplicate names.
    pub async fn create_role(
        &self,
        request: RoleRequest,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<Role> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(Error::validation("El nombre del rol es obligatorio"));
        }
        let permission_ids = self.checked_permission_ids(&request.permission_ids).await?;

        let role = self
            .roles
            .insert_with_permissions(Role::new(name, request.description), &permission_ids)
            .await?;
        self.resolver.invalidate_role(role.id);
        info!(role_id = role.id, name = %role.name, "role created");

        self.audit
            .record_creation(
                actor_id,
                MODULE_USUARIOS,
                "Rol",
                role.id,
                format!("Se creó el rol {}", role.name),
                Some(json!({ "Nombre": role.name, "PermisosIds": permission_ids })),
                ctx,
            )
            .await;
        Ok(role)
    }

    /// Rename/redescribe a role and replace its entire permission set.
    /// The prior set is captured for the audit snapshot before the
    /// replacement commits.
    pub async fn update_role(
        &self,
        role_id: i64,
        request: RoleRequest,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<()> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(Error::validation("El nombre del rol es obligatorio"));
        }
        let role = self
            .roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| Error::not_found("rol", role_id))?;

        let prior_ids = self.roles.permission_ids(role_id).await?;
        let before = json!({
            "Nombre": role.name,
            "Descripcion": role.description,
            "Permisos": prior_ids,
        });

        let permission_ids = self.checked_permission_ids(&request.permission_ids).await?;
        self.roles
            .update_with_permissions(role_id, name, &request.description, &permission_ids)
            .await?;
        self.resolver.invalidate_role(role_id);
        info!(role_id, name, "role updated");

        self.audit
            .record_update(
                actor_id,
                MODULE_USUARIOS,
                "Rol",
                role_id,
                format!("Se actualizó el rol {name}"),
                Some(before),
                Some(json!({ "Nombre": name, "PermisosIds": permission_ids })),
                ctx,
            )
            .await;
        Ok(())
    }

    /// Soft-delete a role. Refused with `RoleInUse` while any active
    /// user still references it; the check and the flip are one store
    /// critical section.
    pub async fn deactivate_role(
        &self,
        role_id: i64,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<()> {
        let role = self
            .roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| Error::not_found("rol", role_id))?;

        self.roles.deactivate(role_id).await?;
        self.resolver.invalidate_role(role_id);
        info!(role_id, name = %role.name, "role deactivated");

        self.audit
            .record_deletion(
                actor_id,
                MODULE_USUARIOS,
                "Rol",
                role_id,
                format!("Se eliminó el rol {}", role.name),
                None,
                ctx,
            )
            .await;
        Ok(())
    }

    /// Active roles
    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        self.roles.list_active().await
    }

    /// One role joined with its active permissions
    pub async fn role_detail(&self, role_id: i64) -> Result<RoleDetail> {
        let role = self
            .roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| Error::not_found("rol", role_id))?;
        let ids = self.roles.permission_ids(role_id).await?;
        let permissions = self
            .permissions
            .list_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|p| p.active)
            .collect();
        Ok(RoleDetail { role, permissions })
    }

    /// Active permissions ordered by (module, name), for assignment UIs
    pub async fn list_permissions(&self) -> Result<Vec<Permission>> {
        self.permissions.list_active().await
    }
}
