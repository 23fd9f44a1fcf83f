//! Migration errors
//!
//! Every variant carries the keyspace / column family / column it refers to
//! so callers can render or classify failures without parsing messages.

use cqlmigrate_catalog::{ExecuteError, FetchError};
use cqlmigrate_core::SchemaError;

#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A desired column family cannot be turned into DDL
    #[error("Invalid schema definition: {0}")]
    InvalidSchemaDefinition(#[from] SchemaError),

    /// The live schema could not be listed
    #[error(
        "[{keyspace}] schema introspection failed{}: {source}",
        .column_family.as_ref().map(|cf| format!(" for {}", cf)).unwrap_or_default()
    )]
    IntrospectionFailure {
        keyspace: String,
        column_family: Option<String>,
        source: FetchError,
    },

    /// A generated statement was rejected
    ///
    /// Statements executed before this one stay applied.
    #[error("[{keyspace}] [{column_family}] failed to execute `{statement}`: {source}")]
    ExecutionFailure {
        keyspace: String,
        column_family: String,
        column: Option<String>,
        statement: String,
        source: ExecuteError,
    },
}

impl MigrateError {
    /// Keyspace the failure happened in, when known
    pub fn keyspace(&self) -> Option<&str> {
        match self {
            Self::InvalidSchemaDefinition(_) => None,
            Self::IntrospectionFailure { keyspace, .. } | Self::ExecutionFailure { keyspace, .. } => {
                Some(keyspace)
            }
        }
    }

    /// Column family the failure refers to, when known
    pub fn column_family(&self) -> Option<&str> {
        match self {
            Self::InvalidSchemaDefinition(err) => Some(err.column_family()),
            Self::IntrospectionFailure { column_family, .. } => column_family.as_deref(),
            Self::ExecutionFailure { column_family, .. } => Some(column_family),
        }
    }
}
