//! Composition root
//!
//! Wires the storage adapter, the cryptographic providers, and the
//! application services into one [`AppContext`].
//!
//! ## Architecture
//!
//! ```text
//! AppConfig → MemoryStore ─┬→ AuditService ──┐
//!                          ├→ PermissionResolver ─→ AuthService
//!                          └→ admin / catalog / enrollment / gradebook
//! ```
//!
//! One `MemoryStore` instance backs every store port, so the compound
//! store contracts (insert-if-absent, reference checks) run against a
//! single consistent state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(config).await?;
//!
//! let outcome = context.authenticator().login(email, password, &ctx).await?;
//! let page = context.audit().list(PageRequest::default()).await?;
//! ```

use crate::auth::JwtTokenIssuer;
use crate::config::{AppConfig, AuthConfig, JwtConfig};
use crate::crypto::Sha256CredentialHasher;
use crate::storage::MemoryStore;
use sia_application::{
    AuditService, AuthService, CatalogService, EnrollmentService, GradebookService,
    PermissionResolver, RoleAdminService, UserAdminService,
};
use sia_domain::error::Result;
use sia_domain::ports::{
    AssignmentStore, AuditStore, CourseStore, CredentialHasher, EnrollmentStore, GradeStore,
    PermissionStore, RoleStore, TokenIssuer, UserStore,
};
use std::sync::Arc;
use tracing::info;

/// Application context holding the wired services
///
/// This is the composition root that combines:
/// - The storage adapter (one instance behind every store port)
/// - Cryptographic providers (credential digest, token issuer)
/// - The security core (authenticator, resolver, role admin, audit)
/// - The callers of the core (users, catalog, enrollment, gradebook)
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ========================================================================
    // Storage (single adapter behind every port)
    // ========================================================================
    store: Arc<MemoryStore>,

    // ========================================================================
    // Security core
    // ========================================================================
    authenticator: Arc<AuthService>,
    resolver: Arc<PermissionResolver>,
    role_admin: Arc<RoleAdminService>,
    audit: Arc<AuditService>,

    // ========================================================================
    // Academic records
    // ========================================================================
    user_admin: Arc<UserAdminService>,
    catalog: Arc<CatalogService>,
    enrollment: Arc<EnrollmentService>,
    gradebook: Arc<GradebookService>,
}

impl AppContext {
    // ========================================================================
    // Storage
    // ========================================================================

    /// Get the storage adapter for direct port access (seeding, tests)
    pub fn store(&self) -> Arc<MemoryStore> {
        self.store.clone()
    }

    // ========================================================================
    // Security core
    // ========================================================================

    /// Get the authentication service
    pub fn authenticator(&self) -> Arc<AuthService> {
        self.authenticator.clone()
    }

    /// Get the permission resolver
    pub fn resolver(&self) -> Arc<PermissionResolver> {
        self.resolver.clone()
    }

    /// Get the role administration service
    pub fn role_admin(&self) -> Arc<RoleAdminService> {
        self.role_admin.clone()
    }

    /// Get the audit trail service
    pub fn audit(&self) -> Arc<AuditService> {
        self.audit.clone()
    }

    // ========================================================================
    // Academic records
    // ========================================================================

    /// Get the user administration service
    pub fn user_admin(&self) -> Arc<UserAdminService> {
        self.user_admin.clone()
    }

    /// Get the course catalog service
    pub fn catalog(&self) -> Arc<CatalogService> {
        self.catalog.clone()
    }

    /// Get the enrollment service
    pub fn enrollment(&self) -> Arc<EnrollmentService> {
        self.enrollment.clone()
    }

    /// Get the gradebook service
    pub fn gradebook(&self) -> Arc<GradebookService> {
        self.gradebook.clone()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Initialize the application context
///
/// Fails when the token configuration cannot back an issuer (missing or
/// short secret). Storage starts empty; there is no seed data.
pub async fn init_app(config: AppConfig) -> Result<AppContext> {
    info!("Initializing application context");

    let config = Arc::new(config);

    // ========================================================================
    // Storage
    // ========================================================================

    let store = Arc::new(MemoryStore::new());
    let users: Arc<dyn UserStore> = store.clone();
    let roles: Arc<dyn RoleStore> = store.clone();
    let permissions: Arc<dyn PermissionStore> = store.clone();
    let events: Arc<dyn AuditStore> = store.clone();
    let courses: Arc<dyn CourseStore> = store.clone();
    let assignments: Arc<dyn AssignmentStore> = store.clone();
    let enrollments: Arc<dyn EnrollmentStore> = store.clone();
    let grades: Arc<dyn GradeStore> = store.clone();

    info!("Created in-memory store");

    // ========================================================================
    // Cryptographic providers
    // ========================================================================

    let hasher: Arc<dyn CredentialHasher> = Arc::new(Sha256CredentialHasher::new());
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(&config.auth.jwt)?);

    info!("Created credential and token providers");

    // ========================================================================
    // Security core
    // ========================================================================

    let audit = Arc::new(AuditService::new(events));
    let resolver = Arc::new(PermissionResolver::new(
        users.clone(),
        roles.clone(),
        permissions.clone(),
    ));
    let authenticator = Arc::new(AuthService::new(
        users.clone(),
        roles.clone(),
        hasher.clone(),
        tokens,
        resolver.clone(),
        audit.clone(),
    ));
    let role_admin = Arc::new(RoleAdminService::new(
        roles.clone(),
        permissions,
        resolver.clone(),
        audit.clone(),
    ));

    info!("Created security core services");

    // ========================================================================
    // Academic records
    // ========================================================================

    let user_admin = Arc::new(UserAdminService::new(
        users.clone(),
        roles,
        hasher,
        resolver.clone(),
        audit.clone(),
    ));
    let catalog = Arc::new(CatalogService::new(
        courses.clone(),
        assignments.clone(),
        enrollments.clone(),
        users.clone(),
        audit.clone(),
    ));
    let enrollment = Arc::new(EnrollmentService::new(
        enrollments.clone(),
        courses.clone(),
        users.clone(),
        assignments,
        audit.clone(),
    ));
    let gradebook = Arc::new(GradebookService::new(
        grades,
        enrollments,
        courses,
        users,
        audit.clone(),
    ));

    info!("Created academic record services");

    Ok(AppContext {
        config,
        store,
        authenticator,
        resolver,
        role_admin,
        audit,
        user_admin,
        catalog,
        enrollment,
        gradebook,
    })
}

/// Initialize an application context for testing, with a fixed
/// development secret long enough to back the token issuer
pub async fn init_test_app() -> Result<AppContext> {
    let config = AppConfig {
        auth: AuthConfig {
            jwt: JwtConfig {
                secret: "secreto-de-pruebas-con-longitud-suficiente".to_owned(),
                ..JwtConfig::default()
            },
        },
        ..AppConfig::default()
    };
    init_app(config).await
}
