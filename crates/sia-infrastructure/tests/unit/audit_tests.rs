//! Tests for audit trail recording, search, and statistics

use crate::common::{app, ctx, seed_account};
use chrono::{Duration, TimeZone, Utc};
use sia_domain::entities::AuditEvent;
use sia_domain::error::Error;
use sia_domain::ports::AuditStore;
use sia_domain::value_objects::{AuditFilter, PageRequest};
use std::sync::Arc;

/// A bare event with a controlled timestamp, appended straight through
/// the store port; the recorder stamps its own timestamps, which these
/// tests need to bypass
fn event_at(timestamp: chrono::DateTime<Utc>, action: &str, module: &str) -> AuditEvent {
    AuditEvent {
        id: 0,
        actor_id: None,
        action: action.to_owned(),
        module: module.to_owned(),
        description: format!("{action} de prueba"),
        timestamp,
        ip: "No disponible".to_owned(),
        agent: "Desconocido".to_owned(),
        entity_type: None,
        entity_id: None,
        before: None,
        after: None,
    }
}

#[tokio::test]
async fn test_trail_lists_newest_first() {
    let app = app().await;
    let audit = app.audit();

    for code in ["MAT-101", "FIS-102", "QUI-103"] {
        audit
            .record_creation(
                None,
                "Cursos",
                "Curso",
                1,
                format!("Se creó el curso {code}"),
                None,
                &ctx(),
            )
            .await;
    }

    let page = audit.list(PageRequest::default()).await.unwrap();
    assert_eq!(page.total, 3);
    assert!(page.items[0].id > page.items[1].id);
    assert!(page.items[1].id > page.items[2].id);
    assert!(page.items[0].description.contains("QUI-103"));
}

#[tokio::test]
async fn test_search_filters_compose() {
    let app = app().await;
    let ana = seed_account(&app, "Docente", "Ana Rojas", "ana@uni.ac.cr").await;
    let luis = seed_account(&app, "Coordinador", "Luis Mora", "luis@uni.ac.cr").await;
    let audit = app.audit();

    audit
        .record_creation(
            Some(ana.id),
            "Cursos",
            "Curso",
            1,
            "Se creó el curso MAT-101 - Cálculo".to_owned(),
            None,
            &ctx(),
        )
        .await;
    audit
        .record_deletion(
            Some(luis.id),
            "Cursos",
            "Curso",
            1,
            "Se eliminó el curso MAT-101 - Cálculo".to_owned(),
            None,
            &ctx(),
        )
        .await;

    // Actor matches the display name or email, case-insensitively
    let by_actor = audit
        .search(
            &AuditFilter {
                actor: Some("ANA".to_owned()),
                ..AuditFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_actor.total, 1);
    assert_eq!(by_actor.items[0].actor_id, Some(ana.id));

    // Action is a case-insensitive substring
    let by_action = audit
        .search(
            &AuditFilter {
                action: Some("elimin".to_owned()),
                ..AuditFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_action.total, 1);
    assert_eq!(by_action.items[0].actor_id, Some(luis.id));

    // Module is exact
    let by_module = audit
        .search(
            &AuditFilter {
                module: Some("Curso".to_owned()),
                ..AuditFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_module.total, 0);

    // Criteria compose with AND
    let composed = audit
        .search(
            &AuditFilter {
                actor: Some("luis".to_owned()),
                action: Some("crea".to_owned()),
                module: Some("Cursos".to_owned()),
                ..AuditFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(composed.total, 0);
}

#[tokio::test]
async fn test_date_range_bounds_are_inclusive() {
    let app = app().await;
    let audit = app.audit();
    audit
        .record_creation(None, "Cursos", "Curso", 1, "Se creó el curso".to_owned(), None, &ctx())
        .await;

    let today = Utc::now().date_naive();
    let full_day = AuditFilter {
        from: Some(today),
        to: Some(today),
        ..AuditFilter::default()
    };
    assert_eq!(
        audit.search(&full_day, PageRequest::default()).await.unwrap().total,
        1
    );

    let starts_tomorrow = AuditFilter {
        from: Some(today + Duration::days(1)),
        ..AuditFilter::default()
    };
    assert_eq!(
        audit
            .search(&starts_tomorrow, PageRequest::default())
            .await
            .unwrap()
            .total,
        0
    );

    let ended_yesterday = AuditFilter {
        to: Some(today - Duration::days(1)),
        ..AuditFilter::default()
    };
    assert_eq!(
        audit
            .search(&ended_yesterday, PageRequest::default())
            .await
            .unwrap()
            .total,
        0
    );
}

#[tokio::test]
async fn test_pagination_never_exceeds_the_page_size() {
    let app = app().await;
    let audit = app.audit();
    for n in 0..5 {
        audit
            .record_creation(
                None,
                "Cursos",
                "Curso",
                n,
                format!("Se creó el curso {n}"),
                None,
                &ctx(),
            )
            .await;
    }

    let first = audit.list(PageRequest::new(1, 2)).await.unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.items.len(), 2);

    let last = audit.list(PageRequest::new(3, 2)).await.unwrap();
    assert_eq!(last.items.len(), 1);

    let beyond = audit.list(PageRequest::new(9, 2)).await.unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);
}

#[tokio::test]
async fn test_statistics_windows_bucket_by_calendar() {
    let app = app().await;
    let store: Arc<dyn AuditStore> = app.store();

    // Reference: Wednesday 2026-08-19; the week began Sunday the 16th
    let reference = Utc.with_ymd_and_hms(2026, 8, 19, 12, 0, 0).unwrap();
    let rows = [
        (Utc.with_ymd_and_hms(2026, 8, 19, 9, 0, 0).unwrap(), "Creación", "Cursos"),
        (Utc.with_ymd_and_hms(2026, 8, 17, 9, 0, 0).unwrap(), "Creación", "Usuarios"),
        (Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap(), "Modificación", "Cursos"),
        (Utc.with_ymd_and_hms(2026, 7, 28, 9, 0, 0).unwrap(), "Eliminación", "Cursos"),
    ];
    for (timestamp, action, module) in rows {
        store.append(event_at(timestamp, action, module)).await.unwrap();
    }

    let stats = store.statistics(reference).await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.today, 1);
    assert_eq!(stats.this_week, 2);
    assert_eq!(stats.this_month, 3);

    // Descending counts, ties by name
    assert_eq!(stats.by_module.len(), 2);
    assert_eq!(stats.by_module[0].key, "Cursos");
    assert_eq!(stats.by_module[0].count, 3);
    assert_eq!(stats.by_module[1].key, "Usuarios");

    assert_eq!(stats.by_action[0].key, "Creación");
    assert_eq!(stats.by_action[0].count, 2);
    assert_eq!(stats.by_action[1].key, "Eliminación");
    assert_eq!(stats.by_action[2].key, "Modificación");
}

#[tokio::test]
async fn test_distinct_modules_and_actions_come_back_sorted() {
    let app = app().await;
    let audit = app.audit();
    audit
        .record_creation(None, "Usuarios", "Usuario", 1, "Se creó el usuario".to_owned(), None, &ctx())
        .await;
    audit
        .record_creation(None, "Cursos", "Curso", 1, "Se creó el curso".to_owned(), None, &ctx())
        .await;
    audit
        .record_deletion(None, "Cursos", "Curso", 1, "Se eliminó el curso".to_owned(), None, &ctx())
        .await;

    assert_eq!(audit.modules().await.unwrap(), vec!["Cursos", "Usuarios"]);
    assert_eq!(
        audit.actions().await.unwrap(),
        vec!["Creación", "Eliminación"]
    );
}

#[tokio::test]
async fn test_lookup_of_a_missing_event_reports_not_found() {
    let app = app().await;
    let err = app.audit().find_by_id(404).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { id: 404, .. }));
}
