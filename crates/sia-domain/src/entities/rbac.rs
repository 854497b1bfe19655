//! Role, permission, and association entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named grouping of permissions. Role names are unique among active
/// roles; a deactivated role's name may be reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Store-assigned id
    pub id: i64,
    /// Unique-among-active name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Soft-delete flag; deactivation refused while active users reference
    /// the role
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Build a role ready for insertion (id assigned by the store)
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// One granular capability scoped to a functional module, e.g.
/// ("editar", "Cursos"). The (name, module) pair is unique. Permissions
/// are never hard-deleted once referenced; only deactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    /// Store-assigned id
    pub id: i64,
    /// Capability name, unique within its module
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Functional module the capability belongs to
    pub module: String,
    /// Soft-delete flag
    pub active: bool,
}

impl Permission {
    /// Build a permission ready for insertion (id assigned by the store)
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            module: module.into(),
            active: true,
        }
    }
}

/// Pure association row. Owned by its role; replaced wholesale when the
/// role's permission set changes, never edited row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    /// Owning role
    pub role_id: i64,
    /// Granted permission
    pub permission_id: i64,
}
