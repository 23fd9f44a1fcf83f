//! cqlmigrate core
//!
//! Desired-state schema model for keyspaces and column families, plus the
//! configuration and report types shared by the other crates.

pub mod config;
pub mod error;
pub mod report;
pub mod schema;

pub use config::{Config, ConfigError, SystemSchemaVersion};
pub use error::SchemaError;
pub use report::{MigrationReport, ReportSummary, ReportVersion, SchemaChange};
pub use schema::{Column, ColumnFamily, Direction, Keyspace, Order};
