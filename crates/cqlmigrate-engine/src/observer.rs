//! Progress events emitted during a migration
//!
//! The migrator never logs directly. It reports structured
//! [`MigrationEvent`]s to a [`MigrationObserver`]; [`TracingObserver`] turns
//! them into `tracing` records.

use std::sync::Mutex;

/// A step of a reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationEvent {
    /// Desired column families were compared against the live keyspace
    ColumnFamiliesChecked {
        keyspace: String,
        missing: Vec<String>,
    },

    /// A missing column family is about to be created
    CreatingColumnFamily {
        keyspace: String,
        column_family: String,
        statement: String,
    },

    /// An existing column family lacks desired columns
    MissingColumns {
        keyspace: String,
        column_family: String,
        columns: Vec<String>,
    },

    /// A missing column is about to be added
    AddingColumn {
        keyspace: String,
        column_family: String,
        column: String,
        column_type: String,
        statement: String,
    },

    /// All missing columns of a column family were added
    ColumnFamilyUpdated {
        keyspace: String,
        column_family: String,
    },

    /// The pass completed
    MigrationFinished {
        keyspace: String,
        statements: usize,
        dry_run: bool,
    },
}

/// Receives migration events
pub trait MigrationObserver: Send + Sync {
    fn on_event(&self, event: &MigrationEvent);
}

/// Renders events with `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MigrationObserver for TracingObserver {
    fn on_event(&self, event: &MigrationEvent) {
        match event {
            MigrationEvent::ColumnFamiliesChecked { keyspace, missing } => {
                if missing.is_empty() {
                    tracing::info!("[{}] keyspace is up-to-date", keyspace);
                } else {
                    tracing::info!("[{}] creating column families: {:?}", keyspace, missing);
                }
            }
            MigrationEvent::CreatingColumnFamily { keyspace, statement, .. } => {
                tracing::info!("[{}] {}", keyspace, statement);
            }
            MigrationEvent::MissingColumns { keyspace, column_family, columns } => {
                tracing::info!("[{}] [{}] missing columns: {:?}", keyspace, column_family, columns);
            }
            MigrationEvent::AddingColumn {
                keyspace,
                column_family,
                column,
                column_type,
                statement,
            } => {
                tracing::info!(
                    "[{}] [{}] adding column: {}.{} ({})",
                    keyspace,
                    column_family,
                    column_family,
                    column,
                    column_type
                );
                tracing::debug!("[{}] {}", keyspace, statement);
            }
            MigrationEvent::ColumnFamilyUpdated { keyspace, column_family } => {
                tracing::info!("[{}] [{}] updated", keyspace, column_family);
            }
            MigrationEvent::MigrationFinished { keyspace, statements, dry_run } => {
                tracing::debug!(keyspace = %keyspace, statements, dry_run, "migration finished");
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MigrationObserver for NoopObserver {
    fn on_event(&self, _event: &MigrationEvent) {}
}

/// Keeps every event, for assertions in tests
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<MigrationEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order
    pub fn events(&self) -> Vec<MigrationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl MigrationObserver for RecordingObserver {
    fn on_event(&self, event: &MigrationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
