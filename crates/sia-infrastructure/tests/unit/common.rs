//! Shared fixtures for the service-level tests
//!
//! Every fixture goes through the real services of a wired
//! [`AppContext`], except permissions, which have no administration
//! service and are seeded straight through the store port.

use sia_application::{CourseRequest, CreateUserRequest, RoleRequest};
use sia_domain::entities::{Course, Permission, Role, User};
use sia_domain::ports::PermissionStore;
use sia_domain::value_objects::RequestContext;
use sia_infrastructure::{AppContext, init_test_app};
use std::sync::Arc;

/// Credential used by every seeded account
pub const PASSWORD: &str = "clave-segura-123";

/// Client context with a fixed address and agent
pub fn ctx() -> RequestContext {
    RequestContext::from_request(Some("10.0.0.9"), None, Some("sia-tests/1.0"))
}

/// Fresh wired application context with empty storage
pub async fn app() -> AppContext {
    init_test_app().await.expect("context should initialize")
}

/// Insert an active permission
pub async fn seed_permission(app: &AppContext, name: &str, module: &str) -> Permission {
    let permissions: Arc<dyn PermissionStore> = app.store();
    permissions
        .insert(Permission::new(name, format!("Permite {name}"), module))
        .await
        .expect("permission should insert")
}

/// Create a role through the administration service
pub async fn seed_role(app: &AppContext, name: &str, permission_ids: Vec<i64>) -> Role {
    app.role_admin()
        .create_role(
            RoleRequest {
                name: name.to_owned(),
                description: format!("Rol {name}"),
                permission_ids,
            },
            None,
            &ctx(),
        )
        .await
        .expect("role should create")
}

/// Create an account through the administration service, credential
/// [`PASSWORD`], empty identification
pub async fn seed_user(app: &AppContext, full_name: &str, email: &str, role_id: i64) -> User {
    app.user_admin()
        .create_user(
            CreateUserRequest {
                full_name: full_name.to_owned(),
                email: email.to_owned(),
                identification: String::new(),
                plaintext: PASSWORD.to_owned(),
                role_id,
            },
            None,
            &ctx(),
        )
        .await
        .expect("user should create")
}

/// Create a course through the catalog service
pub async fn seed_course(app: &AppContext, code: &str, name: &str, term: &str) -> Course {
    app.catalog()
        .create_course(
            CourseRequest {
                code: code.to_owned(),
                name: name.to_owned(),
                description: String::new(),
                credits: 4,
                term: term.to_owned(),
            },
            None,
            &ctx(),
        )
        .await
        .expect("course should create")
}

/// A role with no permissions plus a user holding it, for tests that
/// need a student or teacher identity
pub async fn seed_account(app: &AppContext, role_name: &str, full_name: &str, email: &str) -> User {
    let role = seed_role(app, role_name, Vec::new()).await;
    seed_user(app, full_name, email, role.id).await
}
