//! Offline schema snapshots
//!
//! A snapshot is a JSON capture of a keyspace's live column families and
//! their column names. [`SnapshotCatalog`] serves it through the
//! [`SchemaCatalog`] trait so migrations can be planned without a cluster.
//!
//! ```json
//! {
//!   "keyspace": "app",
//!   "column_families": [
//!     { "name": "users", "columns": ["id", "name"] }
//!   ]
//! }
//! ```

use crate::adapter::{FetchError, SchemaCatalog};
use serde::{Deserialize, Serialize};

/// One live column family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotColumnFamily {
    /// Column family name
    pub name: String,

    /// Column names
    #[serde(default)]
    pub columns: Vec<String>,
}

/// Captured live schema of one keyspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Keyspace the snapshot was taken from
    pub keyspace: String,

    /// Column families in discovery order
    #[serde(default)]
    pub column_families: Vec<SnapshotColumnFamily>,
}

impl SchemaSnapshot {
    /// Create an empty snapshot
    pub fn new(keyspace: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            column_families: Vec::new(),
        }
    }

    /// Add a column family, builder style
    pub fn with_column_family(mut self, name: impl Into<String>, columns: &[&str]) -> Self {
        self.column_families.push(SnapshotColumnFamily {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    /// Find a column family by name
    pub fn find_column_family(&self, name: &str) -> Option<&SnapshotColumnFamily> {
        self.column_families.iter().find(|cf| cf.name == name)
    }

    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        serde_json::from_str(json)
            .map_err(|e| FetchError::InvalidResponse(format!("Invalid schema snapshot: {}", e)))
    }

    /// Load a snapshot from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, FetchError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| FetchError::InvalidResponse(format!("Cannot read schema snapshot {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Read-only catalog over a [`SchemaSnapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotCatalog {
    snapshot: SchemaSnapshot,
}

impl SnapshotCatalog {
    pub fn new(snapshot: SchemaSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &SchemaSnapshot {
        &self.snapshot
    }

    fn check_keyspace(&self, keyspace: &str) -> Result<(), FetchError> {
        if self.snapshot.keyspace == keyspace {
            Ok(())
        } else {
            Err(FetchError::KeyspaceNotFound(format!(
                "{} (snapshot holds {})",
                keyspace, self.snapshot.keyspace
            )))
        }
    }
}

#[async_trait::async_trait]
impl SchemaCatalog for SnapshotCatalog {
    fn name(&self) -> &'static str {
        "Snapshot"
    }

    async fn list_column_families(&self, keyspace: &str) -> Result<Vec<String>, FetchError> {
        self.check_keyspace(keyspace)?;
        Ok(self
            .snapshot
            .column_families
            .iter()
            .map(|cf| cf.name.clone())
            .collect())
    }

    async fn list_columns(&self, keyspace: &str, column_family: &str) -> Result<Vec<String>, FetchError> {
        self.check_keyspace(keyspace)?;
        self.snapshot
            .find_column_family(column_family)
            .map(|cf| cf.columns.clone())
            .ok_or_else(|| {
                FetchError::InvalidResponse(format!("Column family not in snapshot: {}", column_family))
            })
    }
}
