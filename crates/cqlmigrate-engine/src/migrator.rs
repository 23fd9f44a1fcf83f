//! Reconciliation of a live keyspace against a desired one
//!
//! A pass is strictly additive:
//! - column families missing from the live keyspace are created
//! - columns missing from existing column families are added
//! - anything live but not desired is left untouched
//!
//! Creation runs before patching. The first failure aborts the pass and
//! nothing is rolled back; every change is additive, so a partially applied
//! pass is completed by simply running it again.

use crate::ddl;
use crate::error::MigrateError;
use crate::observer::{MigrationEvent, MigrationObserver, TracingObserver};
use cqlmigrate_catalog::{DdlExecutor, SchemaCatalog};
use cqlmigrate_core::{Column, ColumnFamily, Keyspace, MigrationReport, SchemaChange};
use std::collections::HashSet;
use std::sync::Arc;

/// Drives reconciliation passes
///
/// Holds no state between passes besides the observer. Concurrent passes
/// against the same keyspace are not coordinated and may issue duplicate
/// statements.
#[derive(Clone)]
pub struct Migrator {
    observer: Arc<dyn MigrationObserver>,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Migrator {
    /// Create a migrator that reports progress through `tracing`
    pub fn new() -> Self {
        Self::with_observer(Arc::new(TracingObserver))
    }

    /// Create a migrator reporting to a custom observer
    pub fn with_observer(observer: Arc<dyn MigrationObserver>) -> Self {
        Self { observer }
    }

    /// Bring `keyspace` in line with `desired`
    ///
    /// Duplicate column names are rejected before the catalog is queried.
    /// Column families that must be created are fully validated before any
    /// statement runs; existing ones may be partial definitions.
    /// Returns the applied changes in execution order.
    pub async fn migrate(
        &self,
        keyspace: &str,
        desired: &Keyspace,
        catalog: &dyn SchemaCatalog,
        executor: &dyn DdlExecutor,
    ) -> Result<MigrationReport, MigrateError> {
        self.reconcile(keyspace, desired, catalog, Some(executor)).await
    }

    /// Compute the changes `migrate` would apply without executing any
    pub async fn plan(
        &self,
        keyspace: &str,
        desired: &Keyspace,
        catalog: &dyn SchemaCatalog,
    ) -> Result<MigrationReport, MigrateError> {
        self.reconcile(keyspace, desired, catalog, None).await
    }

    async fn reconcile(
        &self,
        keyspace: &str,
        desired: &Keyspace,
        catalog: &dyn SchemaCatalog,
        executor: Option<&dyn DdlExecutor>,
    ) -> Result<MigrationReport, MigrateError> {
        desired.check_column_names()?;

        let live = catalog
            .list_column_families(keyspace)
            .await
            .map_err(|source| MigrateError::IntrospectionFailure {
                keyspace: keyspace.to_string(),
                column_family: None,
                source,
            })?;
        let live: HashSet<&str> = live.iter().map(String::as_str).collect();

        let (present, missing): (Vec<_>, Vec<_>) =
            desired.iter().partition(|(name, _)| live.contains(name));

        // Existing column families are only diffed by column name
        for (name, column_family) in &missing {
            column_family.validate(name)?;
        }

        self.observer.on_event(&MigrationEvent::ColumnFamiliesChecked {
            keyspace: keyspace.to_string(),
            missing: missing.iter().map(|(name, _)| name.to_string()).collect(),
        });

        let mut report = MigrationReport::new(keyspace, executor.is_none());

        for (name, column_family) in missing {
            let change = self.create(keyspace, name, column_family, executor).await?;
            report.add_change(change);
        }

        for (name, column_family) in present {
            for change in self.patch(keyspace, name, column_family, catalog, executor).await? {
                report.add_change(change);
            }
        }

        self.observer.on_event(&MigrationEvent::MigrationFinished {
            keyspace: keyspace.to_string(),
            statements: report.len(),
            dry_run: report.dry_run,
        });

        Ok(report)
    }

    async fn create(
        &self,
        keyspace: &str,
        name: &str,
        column_family: &ColumnFamily,
        executor: Option<&dyn DdlExecutor>,
    ) -> Result<SchemaChange, MigrateError> {
        let statement = ddl::create_column_family(name, column_family)?;

        self.observer.on_event(&MigrationEvent::CreatingColumnFamily {
            keyspace: keyspace.to_string(),
            column_family: name.to_string(),
            statement: statement.clone(),
        });

        execute(executor, &statement, keyspace, name, None).await?;

        Ok(SchemaChange::CreateColumnFamily {
            column_family: name.to_string(),
            statement,
        })
    }

    /// Add the desired columns an existing column family lacks
    async fn patch(
        &self,
        keyspace: &str,
        name: &str,
        column_family: &ColumnFamily,
        catalog: &dyn SchemaCatalog,
        executor: Option<&dyn DdlExecutor>,
    ) -> Result<Vec<SchemaChange>, MigrateError> {
        let live_columns = catalog
            .list_columns(keyspace, name)
            .await
            .map_err(|source| MigrateError::IntrospectionFailure {
                keyspace: keyspace.to_string(),
                column_family: Some(name.to_string()),
                source,
            })?;

        let missing = missing_columns(column_family, &live_columns);
        if missing.is_empty() {
            return Ok(Vec::new());
        }

        self.observer.on_event(&MigrationEvent::MissingColumns {
            keyspace: keyspace.to_string(),
            column_family: name.to_string(),
            columns: missing.iter().map(|c| c.name.clone()).collect(),
        });

        let mut changes = Vec::with_capacity(missing.len());
        for column in missing {
            let statement = ddl::add_column(name, column);

            self.observer.on_event(&MigrationEvent::AddingColumn {
                keyspace: keyspace.to_string(),
                column_family: name.to_string(),
                column: column.name.clone(),
                column_type: column.column_type.clone(),
                statement: statement.clone(),
            });

            execute(executor, &statement, keyspace, name, Some(&column.name)).await?;

            changes.push(SchemaChange::AddColumn {
                column_family: name.to_string(),
                column: column.name.clone(),
                column_type: column.column_type.clone(),
                statement,
            });
        }

        self.observer.on_event(&MigrationEvent::ColumnFamilyUpdated {
            keyspace: keyspace.to_string(),
            column_family: name.to_string(),
        });

        Ok(changes)
    }
}

/// Desired columns absent from the live column family, in declaration order
///
/// A repeated name yields only its first declaration.
pub fn missing_columns<'a>(desired: &'a ColumnFamily, live_columns: &[String]) -> Vec<&'a Column> {
    let mut seen: HashSet<&str> = live_columns.iter().map(String::as_str).collect();
    desired
        .columns
        .iter()
        .filter(|c| seen.insert(c.name.as_str()))
        .collect()
}

/// Run a statement unless this is a dry run
async fn execute(
    executor: Option<&dyn DdlExecutor>,
    statement: &str,
    keyspace: &str,
    column_family: &str,
    column: Option<&str>,
) -> Result<(), MigrateError> {
    let Some(executor) = executor else {
        return Ok(());
    };

    executor
        .execute(statement)
        .await
        .map_err(|source| MigrateError::ExecutionFailure {
            keyspace: keyspace.to_string(),
            column_family: column_family.to_string(),
            column: column.map(str::to_string),
            statement: statement.to_string(),
            source,
        })
}
