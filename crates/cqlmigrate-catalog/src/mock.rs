//! Mock catalog for testing
//!
//! Holds a live schema in memory, records every statement it is asked to
//! execute, and can simulate failures. It's useful for:
//! - Unit testing reconciliation logic
//! - Asserting the exact DDL a migration would issue
//! - Simulating introspection and execution failures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cqlmigrate_catalog::{MockCatalog, SchemaCatalog};
//!
//! let catalog = MockCatalog::new();
//! catalog.add_column_family("app", "users", &["id", "name"]).await;
//!
//! let names = catalog.list_column_families("app").await?;
//! assert_eq!(names, vec!["users"]);
//! ```
//!
//! Executed statements do not change the stored schema; use
//! [`MockCatalog::apply_keyspace`] to model the state a migration leaves behind.

use crate::adapter::{ColumnFamilyRef, DdlExecutor, ExecuteError, FetchError, SchemaCatalog};
use cqlmigrate_core::Keyspace;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Column families of one keyspace, in discovery order
type LiveKeyspace = IndexMap<String, Vec<String>>;

#[derive(Default)]
struct MockState {
    keyspaces: HashMap<String, LiveKeyspace>,

    /// Errors returned when listing a keyspace's column families
    keyspace_errors: HashMap<String, FetchError>,

    /// Errors returned when listing a column family's columns, by FQN
    column_family_errors: HashMap<String, FetchError>,

    /// Statements containing the pattern fail with the reason
    statement_failures: Vec<(String, String)>,

    executed: Vec<String>,
}

/// Mock schema catalog and DDL executor
///
/// Cloning shares the underlying state, so a clone can be handed to the code
/// under test while the original is used for assertions.
#[derive(Clone, Default)]
pub struct MockCatalog {
    state: Arc<RwLock<MockState>>,

    /// Simulate connection failure for every fetch
    fail_connection: bool,
}

impl MockCatalog {
    /// Create a new mock catalog with no keyspaces
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock catalog holding exactly the given desired keyspace
    ///
    /// This is the live schema a successful migration of `keyspace` produces
    /// on an empty cluster.
    pub fn from_keyspace(keyspace_name: &str, keyspace: &Keyspace) -> Self {
        let mut state = MockState::default();
        merge_keyspace(state.keyspaces.entry(keyspace_name.to_string()).or_default(), keyspace);

        Self {
            state: Arc::new(RwLock::new(state)),
            fail_connection: false,
        }
    }

    /// Configure to fail all fetches with a connection error
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Create an empty keyspace
    pub async fn add_keyspace(&self, keyspace: &str) {
        self.state
            .write()
            .await
            .keyspaces
            .entry(keyspace.to_string())
            .or_default();
    }

    /// Add (or replace) a column family with the given columns
    ///
    /// The keyspace is created if needed.
    pub async fn add_column_family(&self, keyspace: &str, column_family: &str, columns: &[&str]) {
        self.state
            .write()
            .await
            .keyspaces
            .entry(keyspace.to_string())
            .or_default()
            .insert(
                column_family.to_string(),
                columns.iter().map(|c| c.to_string()).collect(),
            );
    }

    /// Merge a desired keyspace into the stored live schema
    ///
    /// Missing column families are created, missing columns appended, and
    /// existing ones left alone.
    pub async fn apply_keyspace(&self, keyspace_name: &str, keyspace: &Keyspace) {
        let mut state = self.state.write().await;
        merge_keyspace(state.keyspaces.entry(keyspace_name.to_string()).or_default(), keyspace);
    }

    /// Configure an error for listing a keyspace's column families
    pub async fn add_error_for_keyspace(&self, keyspace: &str, error: FetchError) {
        self.state
            .write()
            .await
            .keyspace_errors
            .insert(keyspace.to_string(), error);
    }

    /// Configure an error for listing a column family's columns
    pub async fn add_error_for_column_family(&self, column_family: ColumnFamilyRef, error: FetchError) {
        self.state
            .write()
            .await
            .column_family_errors
            .insert(column_family.fqn(), error);
    }

    /// Reject every statement containing `pattern`
    pub async fn fail_statements_containing(&self, pattern: &str, reason: &str) {
        self.state
            .write()
            .await
            .statement_failures
            .push((pattern.to_string(), reason.to_string()));
    }

    /// Statements executed so far, including rejected ones
    pub async fn executed(&self) -> Vec<String> {
        self.state.read().await.executed.clone()
    }

    /// Forget recorded statements
    pub async fn clear_executed(&self) {
        self.state.write().await.executed.clear();
    }

    /// Check if a column family exists
    pub async fn has_column_family(&self, keyspace: &str, column_family: &str) -> bool {
        self.state
            .read()
            .await
            .keyspaces
            .get(keyspace)
            .is_some_and(|ks| ks.contains_key(column_family))
    }

    fn check_connection(&self) -> Result<(), FetchError> {
        if self.fail_connection {
            Err(FetchError::ConnectionError(
                "Simulated connection failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

fn merge_keyspace(live: &mut LiveKeyspace, desired: &Keyspace) {
    for (name, cf) in desired.iter() {
        let columns = live.entry(name.to_string()).or_default();
        for column in &cf.columns {
            if !columns.contains(&column.name) {
                columns.push(column.name.clone());
            }
        }
    }
}

#[async_trait::async_trait]
impl SchemaCatalog for MockCatalog {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn list_column_families(&self, keyspace: &str) -> Result<Vec<String>, FetchError> {
        self.check_connection()?;

        let state = self.state.read().await;
        if let Some(error) = state.keyspace_errors.get(keyspace) {
            return Err(error.clone());
        }

        state
            .keyspaces
            .get(keyspace)
            .map(|ks| ks.keys().cloned().collect())
            .ok_or_else(|| FetchError::KeyspaceNotFound(keyspace.to_string()))
    }

    async fn list_columns(&self, keyspace: &str, column_family: &str) -> Result<Vec<String>, FetchError> {
        self.check_connection()?;

        let cf = ColumnFamilyRef::new(keyspace, column_family);
        let state = self.state.read().await;
        if let Some(error) = state.column_family_errors.get(&cf.fqn()) {
            return Err(error.clone());
        }

        let ks = state
            .keyspaces
            .get(keyspace)
            .ok_or_else(|| FetchError::KeyspaceNotFound(keyspace.to_string()))?;

        ks.get(column_family)
            .cloned()
            .ok_or_else(|| FetchError::InvalidResponse(format!("Column family not found: {}", cf)))
    }
}

#[async_trait::async_trait]
impl DdlExecutor for MockCatalog {
    async fn execute(&self, statement: &str) -> Result<(), ExecuteError> {
        let mut state = self.state.write().await;
        state.executed.push(statement.to_string());

        let rejected = state
            .statement_failures
            .iter()
            .find(|(pattern, _)| statement.contains(pattern.as_str()));

        match rejected {
            Some((_, reason)) => Err(ExecuteError::Rejected {
                statement: statement.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}
