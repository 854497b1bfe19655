//! Audit recorder and read contracts
//!
//! One service owns both directions of the trail: appends (with the
//! best-effort / strict split) and the queries the reporting screens
//! consume. Timestamps are stamped here at write time; callers never
//! supply them.

use chrono::Utc;
use serde_json::Value;
use sia_domain::constants::{MODULE_AUTENTICACION, MODULE_USUARIOS};
use sia_domain::entities::{AuditAction, AuditEvent};
use sia_domain::error::{Error, Result};
use sia_domain::ports::AuditStore;
use sia_domain::value_objects::{AuditFilter, AuditStatistics, Page, PageRequest, RequestContext};
use std::sync::Arc;
use tracing::warn;

/// Write model for one audit append. The recorder fills in timestamp and
/// client metadata; everything else is the caller's statement of what
/// happened.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    /// Acting user; `None` marks a system-originated action
    pub actor_id: Option<i64>,
    /// Action kind
    pub action: AuditAction,
    /// Functional module
    pub module: String,
    /// Human-readable summary
    pub description: String,
    /// Affected entity kind
    pub entity_type: Option<String>,
    /// Affected entity id
    pub entity_id: Option<i64>,
    /// Opaque snapshot before the change
    pub before: Option<Value>,
    /// Opaque snapshot after the change
    pub after: Option<Value>,
}

impl AuditRecord {
    /// Minimal record; entity and snapshots attach via the with-methods
    pub fn new(
        actor_id: Option<i64>,
        action: AuditAction,
        module: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            actor_id,
            action,
            module: module.into(),
            description: description.into(),
            entity_type: None,
            entity_id: None,
            before: None,
            after: None,
        }
    }

    /// Name the affected entity
    pub fn entity(mut self, kind: impl Into<String>, id: i64) -> Self {
        self.entity_type = Some(kind.into());
        self.entity_id = Some(id);
        self
    }

    /// Attach the before snapshot
    pub fn before(mut self, snapshot: Value) -> Self {
        self.before = Some(snapshot);
        self
    }

    /// Attach the after snapshot
    pub fn after(mut self, snapshot: Value) -> Self {
        self.after = Some(snapshot);
        self
    }
}

/// Append-only audit trail service
pub struct AuditService {
    store: Arc<dyn AuditStore>,
}

impl AuditService {
    /// Create the service over an audit store
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    fn build_event(record: AuditRecord, ctx: &RequestContext) -> AuditEvent {
        AuditEvent {
            id: 0,
            actor_id: record.actor_id,
            action: record.action.as_str().to_owned(),
            module: record.module,
            description: record.description,
            timestamp: Utc::now(),
            ip: ctx.resolved_ip(),
            agent: ctx.resolved_agent(),
            entity_type: record.entity_type,
            entity_id: record.entity_id,
            before: record.before,
            after: record.after,
        }
    }

    /// Best-effort append. A storage failure is logged and swallowed so
    /// the primary business operation completes; use
    /// [`record_strict`](Self::record_strict) when the write belongs to
    /// the operation's atomic unit.
    pub async fn record(&self, record: AuditRecord, ctx: &RequestContext) {
        let action = record.action;
        let module = record.module.clone();
        let event = Self::build_event(record, ctx);
        if let Err(error) = self.store.append(event).await {
            warn!(%error, %action, module, "audit write dropped");
        }
    }

    /// Coupled append: the failure propagates to the caller and the
    /// surrounding operation reports failure
    pub async fn record_strict(
        &self,
        record: AuditRecord,
        ctx: &RequestContext,
    ) -> Result<AuditEvent> {
        let event = Self::build_event(record, ctx);
        self.store.append(event).await
    }
}

// Fixed-vocabulary helpers, one per action kind
impl AuditService {
    /// Successful login
    pub async fn record_login(&self, user_id: i64, user_name: &str, ctx: &RequestContext) {
        self.record(
            AuditRecord::new(
                Some(user_id),
                AuditAction::Login,
                MODULE_AUTENTICACION,
                format!("El usuario {user_name} inició sesión en el sistema"),
            ),
            ctx,
        )
        .await;
    }

    /// Explicit logout
    pub async fn record_logout(&self, user_id: i64, user_name: &str, ctx: &RequestContext) {
        self.record(
            AuditRecord::new(
                Some(user_id),
                AuditAction::Logout,
                MODULE_AUTENTICACION,
                format!("El usuario {user_name} cerró sesión en el sistema"),
            ),
            ctx,
        )
        .await;
    }

    /// Entity creation with its after snapshot
    pub async fn record_creation(
        &self,
        actor_id: Option<i64>,
        module: &str,
        entity_type: &str,
        entity_id: i64,
        description: String,
        after: Option<Value>,
        ctx: &RequestContext,
    ) {
        let mut record = AuditRecord::new(actor_id, AuditAction::Creation, module, description)
            .entity(entity_type, entity_id);
        if let Some(snapshot) = after {
            record = record.after(snapshot);
        }
        self.record(record, ctx).await;
    }

    /// Entity modification with before/after snapshots
    #[allow(clippy::too_many_arguments)]
    pub async fn record_update(
        &self,
        actor_id: Option<i64>,
        module: &str,
        entity_type: &str,
        entity_id: i64,
        description: String,
        before: Option<Value>,
        after: Option<Value>,
        ctx: &RequestContext,
    ) {
        let mut record = AuditRecord::new(actor_id, AuditAction::Update, module, description)
            .entity(entity_type, entity_id);
        if let Some(snapshot) = before {
            record = record.before(snapshot);
        }
        if let Some(snapshot) = after {
            record = record.after(snapshot);
        }
        self.record(record, ctx).await;
    }

    /// Logical deletion with its before snapshot
    pub async fn record_deletion(
        &self,
        actor_id: Option<i64>,
        module: &str,
        entity_type: &str,
        entity_id: i64,
        description: String,
        before: Option<Value>,
        ctx: &RequestContext,
    ) {
        let mut record = AuditRecord::new(actor_id, AuditAction::Deletion, module, description)
            .entity(entity_type, entity_id);
        if let Some(snapshot) = before {
            record = record.before(snapshot);
        }
        self.record(record, ctx).await;
    }

    /// Role reassignment on a user. Old and new role names travel as the
    /// before/after payloads.
    pub async fn record_role_change(
        &self,
        actor_id: Option<i64>,
        affected_user_id: i64,
        old_role: Option<&str>,
        new_role: Option<&str>,
        ctx: &RequestContext,
    ) {
        let old_name = old_role.unwrap_or("(ninguno)");
        let new_name = new_role.unwrap_or("(ninguno)");
        let record = AuditRecord::new(
            actor_id,
            AuditAction::RoleChange,
            MODULE_USUARIOS,
            format!(
                "Se cambió el rol del usuario {affected_user_id} de '{old_name}' a '{new_name}'"
            ),
        )
        .entity("Usuario", affected_user_id)
        .before(Value::String(old_name.to_owned()))
        .after(Value::String(new_name.to_owned()));
        self.record(record, ctx).await;
    }
}

// Read contracts for the reporting layer
impl AuditService {
    /// Page of the trail, newest first
    pub async fn list(&self, page: PageRequest) -> Result<Page<AuditEvent>> {
        self.store.list(page).await
    }

    /// Filtered page, newest first
    pub async fn search(
        &self,
        filter: &AuditFilter,
        page: PageRequest,
    ) -> Result<Page<AuditEvent>> {
        self.store.search(filter, page).await
    }

    /// One event by id
    pub async fn find_by_id(&self, id: i64) -> Result<AuditEvent> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("bitacora", id))
    }

    /// Sorted distinct modules seen in the trail
    pub async fn modules(&self) -> Result<Vec<String>> {
        self.store.distinct_modules().await
    }

    /// Sorted distinct actions seen in the trail
    pub async fn actions(&self) -> Result<Vec<String>> {
        self.store.distinct_actions().await
    }

    /// Dashboard aggregates anchored at the current time
    pub async fn statistics(&self) -> Result<AuditStatistics> {
        self.store.statistics(Utc::now()).await
    }
}
