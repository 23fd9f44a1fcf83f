//! cqlmigrate engine - Core business logic
//!
//! This crate implements the migration logic:
//! - DDL synthesis for column families and columns
//! - Live vs desired schema reconciliation
//! - Dry-run planning
//! - Structured progress events

pub mod ddl;
pub mod error;
pub mod migrator;
pub mod observer;

pub use ddl::{add_column, create_column_family, quote_identifier};
pub use error::MigrateError;
pub use migrator::{missing_columns, Migrator};
pub use observer::{MigrationEvent, MigrationObserver, NoopObserver, RecordingObserver, TracingObserver};
