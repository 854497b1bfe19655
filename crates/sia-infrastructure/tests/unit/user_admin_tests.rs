//! Tests for user account administration

use crate::common::{PASSWORD, app, ctx, seed_role, seed_user};
use serde_json::json;
use sia_application::{CreateUserRequest, UpdateUserRequest};
use sia_domain::error::Error;
use sia_domain::value_objects::{AuditFilter, PageRequest};

fn create_request(full_name: &str, email: &str, identification: &str, role_id: i64) -> CreateUserRequest {
    CreateUserRequest {
        full_name: full_name.to_owned(),
        email: email.to_owned(),
        identification: identification.to_owned(),
        plaintext: PASSWORD.to_owned(),
        role_id,
    }
}

#[tokio::test]
async fn test_create_user_stores_a_digest_never_the_plaintext() {
    let app = app().await;
    let role = seed_role(&app, "Docente", Vec::new()).await;

    let user = app
        .user_admin()
        .create_user(
            create_request("Ana Rojas", "ana@uni.ac.cr", "1-1111-1111", role.id),
            None,
            &ctx(),
        )
        .await
        .expect("user should create");

    assert_ne!(user.credential_hash, PASSWORD);
    assert_eq!(user.credential_hash.len(), 64);
    app.authenticator()
        .login("ana@uni.ac.cr", PASSWORD, &ctx())
        .await
        .expect("the created account should log in");
}

#[tokio::test]
async fn test_profile_validation() {
    let app = app().await;
    let role = seed_role(&app, "Docente", Vec::new()).await;

    let err = app
        .user_admin()
        .create_user(create_request("  ", "ana@uni.ac.cr", "", role.id), None, &ctx())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed: El nombre completo es obligatorio"
    );

    let err = app
        .user_admin()
        .create_user(create_request("Ana Rojas", "sin-arroba", "", role.id), None, &ctx())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "validation failed: Correo no válido");

    let mut request = create_request("Ana Rojas", "ana@uni.ac.cr", "", role.id);
    request.plaintext = String::new();
    let err = app
        .user_admin()
        .create_user(request, None, &ctx())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed: La contraseña es obligatoria"
    );

    // The role must exist and be active
    let err = app
        .user_admin()
        .create_user(create_request("Ana Rojas", "ana@uni.ac.cr", "", 404), None, &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_email_and_identification_are_globally_unique() {
    let app = app().await;
    let role = seed_role(&app, "Docente", Vec::new()).await;
    let user = app
        .user_admin()
        .create_user(
            create_request("Ana Rojas", "ana@uni.ac.cr", "1-1111-1111", role.id),
            None,
            &ctx(),
        )
        .await
        .unwrap();

    // Email collides case-insensitively
    let err = app
        .user_admin()
        .create_user(
            create_request("Otra Persona", "ANA@uni.ac.cr", "2-2222-2222", role.id),
            None,
            &ctx(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { .. }));

    // Identification collides across accounts
    let err = app
        .user_admin()
        .create_user(
            create_request("Otra Persona", "otra@uni.ac.cr", "1-1111-1111", role.id),
            None,
            &ctx(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { .. }));

    // Uniqueness includes deactivated accounts
    app.user_admin()
        .deactivate_user(user.id, None, &ctx())
        .await
        .unwrap();
    let err = app
        .user_admin()
        .create_user(
            create_request("Otra Persona", "ana@uni.ac.cr", "", role.id),
            None,
            &ctx(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { .. }));
}

#[tokio::test]
async fn test_empty_identification_is_not_subject_to_uniqueness() {
    let app = app().await;
    let role = seed_role(&app, "Docente", Vec::new()).await;
    seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", role.id).await;
    seed_user(&app, "Luis Mora", "luis@uni.ac.cr", role.id).await;

    assert_eq!(app.user_admin().list_users().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_role_change_emits_its_own_event_besides_the_update() {
    let app = app().await;
    let teacher = seed_role(&app, "Docente", Vec::new()).await;
    let coordinator = seed_role(&app, "Coordinador", Vec::new()).await;
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", teacher.id).await;

    app.user_admin()
        .update_user(
            user.id,
            UpdateUserRequest {
                full_name: "Ana Rojas Solano".to_owned(),
                email: "ana@uni.ac.cr".to_owned(),
                identification: "1-1111-1111".to_owned(),
                role_id: coordinator.id,
            },
            Some(user.id),
            &ctx(),
        )
        .await
        .unwrap();

    let change_page = app
        .audit()
        .search(
            &AuditFilter {
                action: Some("Cambio de Rol".to_owned()),
                ..AuditFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(change_page.total, 1);
    let change = &change_page.items[0];
    assert_eq!(change.before, Some(json!("Docente")));
    assert_eq!(change.after, Some(json!("Coordinador")));
    assert_eq!(change.entity_id, Some(user.id));

    let update_page = app
        .audit()
        .search(
            &AuditFilter {
                action: Some("Modificación".to_owned()),
                ..AuditFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(update_page.total, 1);
    let update = &update_page.items[0];
    assert_eq!(update.description, "Se actualizó el usuario Ana Rojas Solano");
    assert_eq!(
        update.before,
        Some(json!({
            "NombreCompleto": "Ana Rojas",
            "Correo": "ana@uni.ac.cr",
            "RolId": teacher.id,
            "Identificacion": "",
        }))
    );
}

#[tokio::test]
async fn test_update_without_role_change_emits_no_change_event() {
    let app = app().await;
    let role = seed_role(&app, "Docente", Vec::new()).await;
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", role.id).await;

    app.user_admin()
        .update_user(
            user.id,
            UpdateUserRequest {
                full_name: "Ana Rojas Solano".to_owned(),
                email: "ana@uni.ac.cr".to_owned(),
                identification: String::new(),
                role_id: role.id,
            },
            None,
            &ctx(),
        )
        .await
        .unwrap();

    let page = app
        .audit()
        .search(
            &AuditFilter {
                action: Some("Cambio de Rol".to_owned()),
                ..AuditFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_reassignment_to_an_inactive_role_is_refused() {
    let app = app().await;
    let teacher = seed_role(&app, "Docente", Vec::new()).await;
    let retired = seed_role(&app, "Temporal", Vec::new()).await;
    app.role_admin()
        .deactivate_role(retired.id, None, &ctx())
        .await
        .unwrap();
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", teacher.id).await;

    let err = app
        .user_admin()
        .update_user(
            user.id,
            UpdateUserRequest {
                full_name: user.full_name.clone(),
                email: user.email.clone(),
                identification: String::new(),
                role_id: retired.id,
            },
            None,
            &ctx(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_deactivation_is_audited_and_hides_the_account() {
    let app = app().await;
    let role = seed_role(&app, "Docente", Vec::new()).await;
    let user = seed_user(&app, "Ana Rojas", "ana@uni.ac.cr", role.id).await;

    app.user_admin()
        .deactivate_user(user.id, None, &ctx())
        .await
        .unwrap();

    assert!(app.user_admin().list_users().await.unwrap().is_empty());

    let page = app
        .audit()
        .search(
            &AuditFilter {
                action: Some("Eliminación".to_owned()),
                ..AuditFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    let deletion = &page.items[0];
    assert_eq!(deletion.description, "Se eliminó el usuario Ana Rojas");
    assert_eq!(
        deletion.before,
        Some(json!({
            "NombreCompleto": "Ana Rojas",
            "Correo": "ana@uni.ac.cr",
            "RolId": role.id,
        }))
    );
}
