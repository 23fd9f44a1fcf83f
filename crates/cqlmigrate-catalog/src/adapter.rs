//! Catalog and executor traits for reading and changing a live schema

use std::fmt;

/// Identifies a column family in a keyspace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnFamilyRef {
    /// Keyspace name
    pub keyspace: String,

    /// Column family name
    pub column_family: String,
}

impl ColumnFamilyRef {
    /// Create a new column family reference
    pub fn new(keyspace: impl Into<String>, column_family: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            column_family: column_family.into(),
        }
    }

    /// Get fully qualified name
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.keyspace, self.column_family)
    }
}

impl fmt::Display for ColumnFamilyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqn())
    }
}

/// Errors that can occur when introspecting a live schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Keyspace not found: {0}")]
    KeyspaceNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors that can occur when executing a DDL statement
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("Statement rejected: {reason} ({statement})")]
    Rejected { statement: String, reason: String },

    #[error("Connection failed: {0}")]
    ConnectionError(String),
}

/// Read access to the live schema of a cluster
#[async_trait::async_trait]
pub trait SchemaCatalog: Send + Sync {
    /// Get the catalog name (e.g., "SystemSchema", "Mock")
    fn name(&self) -> &'static str;

    /// List the column families that currently exist in a keyspace
    ///
    /// An enumeration that cannot complete must return an error, never an
    /// empty list.
    async fn list_column_families(&self, keyspace: &str) -> Result<Vec<String>, FetchError>;

    /// List the column names of an existing column family
    async fn list_columns(&self, keyspace: &str, column_family: &str) -> Result<Vec<String>, FetchError>;
}

/// Executes schema-altering statements against a cluster
#[async_trait::async_trait]
pub trait DdlExecutor: Send + Sync {
    /// Execute one statement; results are not inspected
    async fn execute(&self, statement: &str) -> Result<(), ExecuteError>;
}
