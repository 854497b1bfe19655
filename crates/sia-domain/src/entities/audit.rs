//! Audit trail entity and action vocabulary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The fixed action vocabulary recorded into the trail. The rendered
/// Spanish strings are the stored values; reporting filters match them by
/// substring, so they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    /// Successful login
    Login,
    /// Explicit logout
    Logout,
    /// Entity creation
    Creation,
    /// Entity modification
    Update,
    /// Logical deletion (deactivation / withdrawal)
    Deletion,
    /// User role reassignment
    RoleChange,
}

impl AuditAction {
    /// Stored string for this action kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "Inicio de Sesión",
            Self::Logout => "Cierre de Sesión",
            Self::Creation => "Creación",
            Self::Update => "Modificación",
            Self::Deletion => "Eliminación",
            Self::RoleChange => "Cambio de Rol",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable record of a state-changing or security-relevant action.
///
/// Append-only: the store exposes no update or delete for these rows, and
/// the timestamp is assigned by the recorder at write time, never taken
/// from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Store-assigned id
    pub id: i64,
    /// Acting user; `None` marks a system-originated action
    pub actor_id: Option<i64>,
    /// Action kind as stored, see [`AuditAction::as_str`]
    pub action: String,
    /// Functional module the action belongs to
    pub module: String,
    /// Human-readable summary
    pub description: String,
    /// Recorder-assigned write timestamp
    pub timestamp: DateTime<Utc>,
    /// Client IP or a sentinel
    pub ip: String,
    /// Client user-agent or a sentinel
    pub agent: String,
    /// Affected entity kind, e.g. "Usuario", "Curso"
    pub entity_type: Option<String>,
    /// Affected entity id
    pub entity_id: Option<i64>,
    /// Opaque caller-supplied snapshot before the change
    pub before: Option<Value>,
    /// Opaque caller-supplied snapshot after the change
    pub after: Option<Value>,
}
