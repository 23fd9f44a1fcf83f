//! End-to-end reconciliation tests against the mock catalog
//!
//! ```bash
//! cargo test -p cqlmigrate-engine --test integration_tests
//! ```

mod fixtures;

use cqlmigrate_catalog::{MockCatalog, SchemaSnapshot, SnapshotCatalog};
use cqlmigrate_core::{Column, ColumnFamily, Keyspace};
use cqlmigrate_engine::{MigrateError, Migrator, NoopObserver};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn migrator() -> Migrator {
    Migrator::with_observer(Arc::new(NoopObserver))
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_empty_keyspace_gets_every_column_family() {
    let catalog = MockCatalog::new();
    catalog.add_keyspace("app").await;

    let report = migrator()
        .migrate("app", &fixtures::app_keyspace(), &catalog, &catalog)
        .await
        .unwrap();

    assert_eq!(
        catalog.executed().await,
        vec![
            r#"CREATE COLUMNFAMILY "users" ("id" uuid, "name" text, "email" text, PRIMARY KEY ("id"))"#,
            r#"CREATE COLUMNFAMILY "events" ("id" uuid, "ts" timestamp, "payload" text, PRIMARY KEY (("id"), "ts")) WITH CLUSTERING ORDER BY ("ts" DESC)"#,
            concat!(
                r#"CREATE COLUMNFAMILY "messages" ("tenant" text, "day" date, "sent_at" timeuuid, "body" text, "headers" map<text, text>, "#,
                r#"PRIMARY KEY (("tenant", "day"), "sent_at")) WITH CLUSTERING ORDER BY ("sent_at" DESC)"#
            ),
        ]
    );
    assert_eq!(report.summary.column_families_created, 3);
    assert_eq!(report.summary.total, 3);
}

#[tokio::test]
async fn test_missing_column_family_is_created_and_existing_untouched() {
    let catalog = MockCatalog::new();
    catalog.add_column_family("app", "users", &["id", "name", "email"]).await;

    let desired = Keyspace::new()
        .with_column_family("users", fixtures::users())
        .with_column_family("events", fixtures::events());

    migrator().migrate("app", &desired, &catalog, &catalog).await.unwrap();

    let executed = catalog.executed().await;
    assert_eq!(executed.len(), 1);
    assert!(executed[0].starts_with(r#"CREATE COLUMNFAMILY "events""#));
    assert!(executed.iter().all(|s| !s.contains("users")));
}

#[tokio::test]
async fn test_missing_column_is_added() {
    let catalog = MockCatalog::new();
    catalog.add_column_family("app", "users", &["id", "name"]).await;

    let desired = Keyspace::new().with_column_family("users", fixtures::users());
    migrator().migrate("app", &desired, &catalog, &catalog).await.unwrap();

    assert_eq!(
        catalog.executed().await,
        vec![r#"ALTER TABLE users ADD "email" text"#]
    );
}

#[tokio::test]
async fn test_live_only_objects_are_never_dropped() {
    let catalog = MockCatalog::new();
    catalog
        .add_column_family("app", "users", &["id", "name", "email", "legacy_flag"])
        .await;
    catalog.add_column_family("app", "old_sessions", &["token"]).await;

    let desired = Keyspace::new().with_column_family("users", fixtures::users());
    let report = migrator().migrate("app", &desired, &catalog, &catalog).await.unwrap();

    assert!(report.is_empty());
    for statement in catalog.executed().await {
        assert!(!statement.contains("DROP"));
    }
    assert!(catalog.has_column_family("app", "old_sessions").await);
}

// =============================================================================
// Idempotence
// =============================================================================

#[tokio::test]
async fn test_second_pass_emits_nothing() {
    let desired = fixtures::app_keyspace();

    let catalog = MockCatalog::new();
    catalog.add_column_family("app", "users", &["id"]).await;
    catalog.add_column_family("app", "unmanaged", &["k"]).await;

    let first = migrator().migrate("app", &desired, &catalog, &catalog).await.unwrap();
    assert_eq!(first.summary.column_families_created, 2);
    assert_eq!(first.summary.columns_added, 2);

    // Live schema after the first pass
    catalog.apply_keyspace("app", &desired).await;
    catalog.clear_executed().await;

    let second = migrator().migrate("app", &desired, &catalog, &catalog).await.unwrap();
    assert!(second.is_empty());
    assert!(catalog.executed().await.is_empty());
}

#[tokio::test]
async fn test_fully_migrated_keyspace_is_up_to_date() {
    let desired = fixtures::app_keyspace();
    let catalog = MockCatalog::from_keyspace("app", &desired);

    let plan = migrator().plan("app", &desired, &catalog).await.unwrap();
    assert!(plan.is_empty());
}

#[tokio::test]
async fn test_rerun_after_partial_failure_completes() {
    let desired = fixtures::app_keyspace();
    let catalog = MockCatalog::new();
    catalog.add_keyspace("app").await;
    catalog.fail_statements_containing("\"messages\"", "timeout").await;

    let err = migrator().migrate("app", &desired, &catalog, &catalog).await.unwrap_err();
    assert_eq!(err.column_family(), Some("messages"));

    // users and events were applied before the failure
    let applied = Keyspace::new()
        .with_column_family("users", fixtures::users())
        .with_column_family("events", fixtures::events());
    catalog.apply_keyspace("app", &applied).await;

    let retry = migrator().plan("app", &desired, &catalog).await.unwrap();
    assert_eq!(retry.len(), 1);
    assert!(retry.statements()[0].starts_with(r#"CREATE COLUMNFAMILY "messages""#));
}

// =============================================================================
// Planning against snapshots
// =============================================================================

#[tokio::test]
async fn test_plan_from_snapshot() {
    let snapshot = SchemaSnapshot::new("app")
        .with_column_family("users", &["id", "name"])
        .with_column_family("events", &["id", "ts", "payload"]);
    let catalog = SnapshotCatalog::new(snapshot);

    let plan = migrator().plan("app", &fixtures::app_keyspace(), &catalog).await.unwrap();

    assert!(plan.dry_run);
    assert_eq!(plan.summary.column_families_created, 1);
    assert_eq!(plan.summary.columns_added, 1);
    assert!(plan.statements()[0].starts_with(r#"CREATE COLUMNFAMILY "messages""#));
    assert_eq!(plan.statements()[1], r#"ALTER TABLE users ADD "email" text"#);
}

#[tokio::test]
async fn test_plan_against_wrong_snapshot_fails() {
    let catalog = SnapshotCatalog::new(SchemaSnapshot::new("staging"));
    let err = migrator()
        .plan("app", &fixtures::app_keyspace(), &catalog)
        .await
        .unwrap_err();

    assert!(matches!(err, MigrateError::IntrospectionFailure { .. }));
}

#[tokio::test]
async fn test_empty_column_family_is_rejected() {
    let catalog = MockCatalog::new();
    catalog.add_keyspace("app").await;

    let desired = Keyspace::new()
        .with_column_family("users", fixtures::users())
        .with_column_family("nothing", ColumnFamily::new());

    let err = migrator().migrate("app", &desired, &catalog, &catalog).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid schema definition: No columns defined for column family: nothing"
    );
    assert!(catalog.executed().await.is_empty());

    let desired = Keyspace::new().with_column_family(
        "keyless",
        ColumnFamily::new().with_column(Column::new("value", "text")),
    );
    let err = migrator().migrate("app", &desired, &catalog, &catalog).await.unwrap_err();
    assert_eq!(err.column_family(), Some("keyless"));
}
