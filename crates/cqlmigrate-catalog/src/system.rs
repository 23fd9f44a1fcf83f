//! Catalog backed by the cluster's own system tables
//!
//! Schema metadata lives in regular system tables, so introspection is plain
//! CQL issued through whatever driver session the application already holds.
//! The driver is abstracted behind [`CqlSession`]; this module only knows
//! which queries to run.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let catalog = SystemSchemaCatalog::new(session, SystemSchemaVersion::Modern);
//! let tables = catalog.list_column_families("app").await?;
//! ```

use crate::adapter::{DdlExecutor, ExecuteError, FetchError, SchemaCatalog};
use cqlmigrate_core::SystemSchemaVersion;

/// Minimal driver surface needed for introspection and DDL
#[async_trait::async_trait]
pub trait CqlSession: Send + Sync {
    /// Run a query whose rows have a single text column, binding `params`
    /// positionally, and collect that column
    async fn query_strings(&self, cql: &str, params: &[&str]) -> Result<Vec<String>, FetchError>;

    /// Execute a statement without inspecting its result
    async fn execute(&self, cql: &str) -> Result<(), ExecuteError>;
}

/// Introspection queries for a system table layout
pub trait SystemQueries {
    /// Query listing column families, bound to the keyspace name
    fn column_families_query(&self) -> &'static str;

    /// Query listing columns, bound to keyspace and column family names
    fn columns_query(&self) -> &'static str;
}

impl SystemQueries for SystemSchemaVersion {
    fn column_families_query(&self) -> &'static str {
        match self {
            Self::Legacy => {
                "SELECT columnfamily_name FROM system.schema_columnfamilies WHERE keyspace_name = ?"
            }
            Self::Modern => "SELECT table_name FROM system_schema.tables WHERE keyspace_name = ?",
        }
    }

    fn columns_query(&self) -> &'static str {
        match self {
            Self::Legacy => {
                "SELECT column_name FROM system.schema_columns WHERE keyspace_name = ? AND columnfamily_name = ? ALLOW FILTERING"
            }
            Self::Modern => {
                "SELECT column_name FROM system_schema.columns WHERE keyspace_name = ? AND table_name = ?"
            }
        }
    }
}

/// Schema catalog and DDL executor over a [`CqlSession`]
pub struct SystemSchemaCatalog<S> {
    session: S,
    version: SystemSchemaVersion,
}

impl<S: CqlSession> SystemSchemaCatalog<S> {
    pub fn new(session: S, version: SystemSchemaVersion) -> Self {
        Self { session, version }
    }

    /// System table layout in use
    pub fn version(&self) -> SystemSchemaVersion {
        self.version
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }
}

#[async_trait::async_trait]
impl<S: CqlSession> SchemaCatalog for SystemSchemaCatalog<S> {
    fn name(&self) -> &'static str {
        "SystemSchema"
    }

    async fn list_column_families(&self, keyspace: &str) -> Result<Vec<String>, FetchError> {
        let query = self.version.column_families_query();
        tracing::debug!(keyspace, query, "listing column families");

        self.session
            .query_strings(query, &[keyspace])
            .await
            .map_err(|e| with_context(e, &format!("could not query column families of {}", keyspace)))
    }

    async fn list_columns(&self, keyspace: &str, column_family: &str) -> Result<Vec<String>, FetchError> {
        let query = self.version.columns_query();
        tracing::debug!(keyspace, column_family, query, "listing columns");

        self.session
            .query_strings(query, &[keyspace, column_family])
            .await
            .map_err(|e| {
                with_context(e, &format!("could not query column names of {}.{}", keyspace, column_family))
            })
    }
}

#[async_trait::async_trait]
impl<S: CqlSession> DdlExecutor for SystemSchemaCatalog<S> {
    async fn execute(&self, statement: &str) -> Result<(), ExecuteError> {
        self.session.execute(statement).await
    }
}

/// Prefix a query failure with what was being fetched
fn with_context(error: FetchError, context: &str) -> FetchError {
    match error {
        FetchError::QueryError(msg) => FetchError::QueryError(format!("{}: {}", context, msg)),
        other => other,
    }
}
