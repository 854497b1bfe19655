//! Tests for effective-permission resolution and cache coherence

use crate::common::{app, ctx, seed_permission, seed_role, seed_user};
use sia_application::{RoleRequest, UpdateUserRequest};
use sia_domain::error::Error;

#[tokio::test]
async fn test_permissions_flow_from_the_role_associations() {
    let app = app().await;
    let view = seed_permission(&app, "cursos.ver", "Cursos").await;
    let edit = seed_permission(&app, "cursos.editar", "Cursos").await;
    let role = seed_role(&app, "Docente", vec![view.id, edit.id]).await;
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", role.id).await;

    let resolver = app.resolver();
    let effective = resolver.resolve_effective_permissions(user.id).await.unwrap();
    assert_eq!(effective.len(), 2);
    assert!(effective.contains("cursos.ver"));
    assert!(effective.contains("cursos.editar"));

    assert!(resolver.has_permission(user.id, "cursos.ver").await.unwrap());
    assert!(!resolver.has_permission(user.id, "usuarios.editar").await.unwrap());

    resolver.authorize(user.id, "cursos.editar").await.unwrap();
    let err = resolver
        .authorize(user.id, "usuarios.editar")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));
}

#[tokio::test]
async fn test_resolution_fails_closed() {
    let app = app().await;
    let resolver = app.resolver();

    // Unknown user resolves empty rather than erroring
    assert!(
        resolver
            .resolve_effective_permissions(404)
            .await
            .unwrap()
            .is_empty()
    );

    // A deactivated user loses every permission
    let view = seed_permission(&app, "cursos.ver", "Cursos").await;
    let role = seed_role(&app, "Docente", vec![view.id]).await;
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", role.id).await;
    assert!(resolver.has_permission(user.id, "cursos.ver").await.unwrap());

    app.user_admin()
        .deactivate_user(user.id, None, &ctx())
        .await
        .unwrap();
    assert!(!resolver.has_permission(user.id, "cursos.ver").await.unwrap());
}

#[tokio::test]
async fn test_revocation_is_visible_on_the_very_next_call() {
    let app = app().await;
    let view = seed_permission(&app, "cursos.ver", "Cursos").await;
    let grade = seed_permission(&app, "historial.calificar", "Historial").await;
    let role = seed_role(&app, "Docente", vec![view.id, grade.id]).await;
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", role.id).await;

    let resolver = app.resolver();
    // Warm the cache
    assert!(
        resolver
            .has_permission(user.id, "historial.calificar")
            .await
            .unwrap()
    );

    // Replace the set, dropping the grading permission
    app.role_admin()
        .update_role(
            role.id,
            RoleRequest {
                name: "Docente".to_owned(),
                description: "Rol Docente".to_owned(),
                permission_ids: vec![view.id],
            },
            None,
            &ctx(),
        )
        .await
        .unwrap();

    assert!(
        !resolver
            .has_permission(user.id, "historial.calificar")
            .await
            .unwrap()
    );
    assert!(resolver.has_permission(user.id, "cursos.ver").await.unwrap());
}

#[tokio::test]
async fn test_role_reassignment_drops_the_cached_resolution() {
    let app = app().await;
    let view = seed_permission(&app, "cursos.ver", "Cursos").await;
    let admin = seed_permission(&app, "usuarios.editar", "Usuarios").await;
    let teacher = seed_role(&app, "Docente", vec![view.id]).await;
    let administrator = seed_role(&app, "Administrador", vec![admin.id]).await;
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", teacher.id).await;

    let resolver = app.resolver();
    assert!(resolver.has_permission(user.id, "cursos.ver").await.unwrap());

    app.user_admin()
        .update_user(
            user.id,
            UpdateUserRequest {
                full_name: user.full_name.clone(),
                email: user.email.clone(),
                identification: user.identification.clone(),
                role_id: administrator.id,
            },
            None,
            &ctx(),
        )
        .await
        .unwrap();

    assert!(!resolver.has_permission(user.id, "cursos.ver").await.unwrap());
    assert!(
        resolver
            .has_permission(user.id, "usuarios.editar")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_duplicate_grants_deduplicate_by_name() {
    let app = app().await;
    // Same capability name in two modules still resolves as one name
    let first = seed_permission(&app, "exportar", "Cursos").await;
    let second = seed_permission(&app, "exportar", "Historial").await;
    let role = seed_role(&app, "Auditor", vec![first.id, second.id]).await;
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", role.id).await;

    let effective = app
        .resolver()
        .resolve_effective_permissions(user.id)
        .await
        .unwrap();
    assert_eq!(effective.len(), 1);
    assert!(effective.contains("exportar"));
}
