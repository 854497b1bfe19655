//! Tests for role lifecycle and permission-set administration

use crate::common::{app, ctx, seed_permission, seed_role, seed_user};
use serde_json::json;
use sia_application::RoleRequest;
use sia_domain::error::Error;
use sia_domain::value_objects::{AuditFilter, PageRequest};

fn request(name: &str, permission_ids: Vec<i64>) -> RoleRequest {
    RoleRequest {
        name: name.to_owned(),
        description: format!("Rol {name}"),
        permission_ids,
    }
}

#[tokio::test]
async fn test_create_role_with_its_permission_set() {
    let app = app().await;
    let view = seed_permission(&app, "cursos.ver", "Cursos").await;
    let edit = seed_permission(&app, "cursos.editar", "Cursos").await;

    let role = app
        .role_admin()
        .create_role(request("Docente", vec![edit.id, view.id, view.id]), None, &ctx())
        .await
        .expect("role should create");
    assert!(role.id > 0);
    assert!(role.active);

    let detail = app.role_admin().role_detail(role.id).await.unwrap();
    // Duplicated input ids collapse; permissions come back (module, name) sorted
    assert_eq!(detail.permissions.len(), 2);
    assert_eq!(detail.permissions[0].name, "cursos.editar");
    assert_eq!(detail.permissions[1].name, "cursos.ver");
}

#[tokio::test]
async fn test_role_name_is_unique_among_active_only() {
    let app = app().await;
    let role = seed_role(&app, "Docente", Vec::new()).await;

    // Case-insensitive collision
    let err = app
        .role_admin()
        .create_role(request("docente", Vec::new()), None, &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateName { .. }));

    // A deactivated role releases its name
    app.role_admin()
        .deactivate_role(role.id, None, &ctx())
        .await
        .unwrap();
    app.role_admin()
        .create_role(request("Docente", Vec::new()), None, &ctx())
        .await
        .expect("the released name should be reusable");
}

#[tokio::test]
async fn test_blank_name_and_unknown_permission_are_refused() {
    let app = app().await;

    let err = app
        .role_admin()
        .create_role(request("   ", Vec::new()), None, &ctx())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed: El nombre del rol es obligatorio"
    );

    let err = app
        .role_admin()
        .create_role(request("Docente", vec![999]), None, &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { id: 999, .. }));
}

#[tokio::test]
async fn test_update_replaces_the_whole_permission_set() {
    let app = app().await;
    let view = seed_permission(&app, "cursos.ver", "Cursos").await;
    let edit = seed_permission(&app, "cursos.editar", "Cursos").await;
    let export = seed_permission(&app, "cursos.exportar", "Cursos").await;
    let role = seed_role(&app, "Docente", vec![view.id, edit.id]).await;

    app.role_admin()
        .update_role(role.id, request("Coordinador", vec![export.id]), None, &ctx())
        .await
        .unwrap();

    let detail = app.role_admin().role_detail(role.id).await.unwrap();
    assert_eq!(detail.role.name, "Coordinador");
    assert_eq!(detail.permissions.len(), 1);
    assert_eq!(detail.permissions[0].name, "cursos.exportar");
}

#[tokio::test]
async fn test_rename_onto_another_active_role_is_refused() {
    let app = app().await;
    seed_role(&app, "Docente", Vec::new()).await;
    let other = seed_role(&app, "Auxiliar", Vec::new()).await;

    let err = app
        .role_admin()
        .update_role(other.id, request("Docente", Vec::new()), None, &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateName { .. }));

    // Keeping its own name is not a collision
    app.role_admin()
        .update_role(other.id, request("Auxiliar", Vec::new()), None, &ctx())
        .await
        .expect("a role should update under its own name");
}

#[tokio::test]
async fn test_deactivation_refused_while_users_hold_the_role() {
    let app = app().await;
    let role = seed_role(&app, "Docente", Vec::new()).await;
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", role.id).await;

    let err = app
        .role_admin()
        .deactivate_role(role.id, None, &ctx())
        .await
        .unwrap_err();
    match err {
        Error::RoleInUse { name } => assert_eq!(name, "Docente"),
        other => panic!("expected RoleInUse, got {other}"),
    }
    // The role stays active
    assert!(app.role_admin().role_detail(role.id).await.unwrap().role.active);

    // Releasing the last holder unblocks the deletion
    app.user_admin()
        .deactivate_user(user.id, None, &ctx())
        .await
        .unwrap();
    app.role_admin()
        .deactivate_role(role.id, None, &ctx())
        .await
        .expect("an unreferenced role should deactivate");
    assert!(app.role_admin().list_roles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_role_mutations_are_audited_with_snapshots() {
    let app = app().await;
    let view = seed_permission(&app, "cursos.ver", "Cursos").await;
    let edit = seed_permission(&app, "cursos.editar", "Cursos").await;

    let role = app
        .role_admin()
        .create_role(request("Docente", vec![view.id]), None, &ctx())
        .await
        .unwrap();
    app.role_admin()
        .update_role(role.id, request("Coordinador", vec![edit.id]), None, &ctx())
        .await
        .unwrap();
    app.role_admin()
        .deactivate_role(role.id, None, &ctx())
        .await
        .unwrap();

    let filter = AuditFilter {
        module: Some("Usuarios".to_owned()),
        ..AuditFilter::default()
    };
    let page = app
        .audit()
        .search(&filter, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);

    // Newest first: deletion, update, creation
    let deletion = &page.items[0];
    assert_eq!(deletion.action, "Eliminación");
    assert_eq!(deletion.description, "Se eliminó el rol Coordinador");
    assert_eq!(deletion.entity_type.as_deref(), Some("Rol"));
    assert_eq!(deletion.entity_id, Some(role.id));
    assert!(deletion.before.is_none());
    assert!(deletion.after.is_none());

    let update = &page.items[1];
    assert_eq!(update.action, "Modificación");
    assert_eq!(
        update.before,
        Some(json!({
            "Nombre": "Docente",
            "Descripcion": "Rol Docente",
            "Permisos": [view.id],
        }))
    );
    assert_eq!(
        update.after,
        Some(json!({ "Nombre": "Coordinador", "PermisosIds": [edit.id] }))
    );

    let creation = &page.items[2];
    assert_eq!(creation.action, "Creación");
    assert_eq!(creation.description, "Se creó el rol Docente");
    assert_eq!(
        creation.after,
        Some(json!({ "Nombre": "Docente", "PermisosIds": [view.id] }))
    );
}

#[tokio::test]
async fn test_concurrent_creation_of_the_same_name_admits_one() {
    let app = app().await;
    let admin = app.role_admin();

    let first_ctx = ctx();
    let second_ctx = ctx();
    let (first, second) = tokio::join!(
        admin.create_role(request("Docente", Vec::new()), None, &first_ctx),
        admin.create_role(request("Docente", Vec::new()), None, &second_ctx),
    );

    assert!(
        first.is_ok() ^ second.is_ok(),
        "exactly one concurrent creation should win"
    );
    let roles = app.role_admin().list_roles().await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, "Docente");
}
