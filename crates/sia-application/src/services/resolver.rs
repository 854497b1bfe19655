//! Effective-permission resolution
//!
//! Follows user → role → permission associations and deduplicates into a
//! set of permission names. Fail-closed throughout: a missing user, an
//! inactive user, a missing role, or an inactive role all resolve to the
//! empty set.
//!
//! ## Cache coherence
//!
//! Resolutions are cached per user, keyed by (role id, permission-set
//! version). The store bumps the version inside the same critical
//! section as any permission-set mutation, so an entry computed before a
//! mutation's commit can never match the version read after it. Role and
//! user administration additionally drop affected entries synchronously
//! before returning. Serving a revoked permission from cache is a
//! security defect here, not a tuning knob.

use parking_lot::RwLock;
use sia_domain::error::{Error, Result};
use sia_domain::ports::{PermissionStore, RoleStore, UserStore};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

struct CachedResolution {
    role_id: i64,
    version: u64,
    names: Arc<HashSet<String>>,
}

/// Permission resolver with a version-keyed cache
pub struct PermissionResolver {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
    cache: RwLock<HashMap<i64, CachedResolution>>,
}

impl PermissionResolver {
    /// Create the resolver over its three stores
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
    ) -> Self {
        Self {
            users,
            roles,
            permissions,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The deduplicated permission names currently effective for a user
    pub async fn resolve_effective_permissions(&self, user_id: i64) -> Result<HashSet<String>> {
        Ok(self.resolved(user_id).await?.as_ref().clone())
    }

    /// Membership test over the resolved set, same fail-closed default
    pub async fn has_permission(&self, user_id: i64, permission: &str) -> Result<bool> {
        Ok(self.resolved(user_id).await?.contains(permission))
    }

    /// Authorization gate: `Unauthorized` when the permission is not held
    pub async fn authorize(&self, user_id: i64, permission: &str) -> Result<()> {
        if self.has_permission(user_id, permission).await? {
            Ok(())
        } else {
            warn!(user_id, permission, "permission denied");
            Err(Error::unauthorized(permission))
        }
    }

    /// Drop the cached resolution of one user. Called synchronously when
    /// the user's role reference changes.
    pub fn invalidate_user(&self, user_id: i64) {
        self.cache.write().remove(&user_id);
    }

    /// Drop every cached resolution computed from a role. Called
    /// synchronously by role administration after any mutation commits.
    pub fn invalidate_role(&self, role_id: i64) {
        self.cache.write().retain(|_, entry| entry.role_id != role_id);
    }

    async fn resolved(&self, user_id: i64) -> Result<Arc<HashSet<String>>> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(Arc::new(HashSet::new()));
        };
        if !user.active {
            return Ok(Arc::new(HashSet::new()));
        }
        let Some(role) = self.roles.find_by_id(user.role_id).await? else {
            return Ok(Arc::new(HashSet::new()));
        };
        if !role.active {
            return Ok(Arc::new(HashSet::new()));
        }

        let version = self.roles.permission_version(role.id).await?;
        if let Some(entry) = self.cache.read().get(&user_id)
            && entry.role_id == role.id
            && entry.version == version
        {
            return Ok(Arc::clone(&entry.names));
        }

        let ids = self.roles.permission_ids(role.id).await?;
        let names: HashSet<String> = self
            .permissions
            .list_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|p| p.active)
            .map(|p| p.name)
            .collect();
        debug!(user_id, role_id = role.id, version, count = names.len(), "permissions resolved");

        let names = Arc::new(names);
        self.cache.write().insert(
            user_id,
            CachedResolution {
                role_id: role.id,
                version,
                names: Arc::clone(&names),
            },
        );
        Ok(names)
    }
}
