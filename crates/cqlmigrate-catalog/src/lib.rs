//! Live schema catalogs for column-family migrations
//!
//! This crate provides the two seams a migration talks to: a
//! [`SchemaCatalog`] that lists existing column families and columns, and a
//! [`DdlExecutor`] that runs schema-altering statements.
//!
//! ## Catalogs
//!
//! - [`SystemSchemaCatalog`] - queries the cluster's system tables through any
//!   driver wrapped in a [`CqlSession`]
//! - [`SnapshotCatalog`] - serves a JSON capture for offline planning
//! - [`MockCatalog`] - in-memory catalog and executor for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use cqlmigrate_catalog::{SystemSchemaCatalog, SchemaCatalog};
//! use cqlmigrate_core::SystemSchemaVersion;
//!
//! let catalog = SystemSchemaCatalog::new(session, SystemSchemaVersion::Modern);
//! let tables = catalog.list_column_families("app").await?;
//! ```

pub mod adapter;
pub mod mock;
pub mod snapshot;
pub mod system;

pub use adapter::{ColumnFamilyRef, DdlExecutor, ExecuteError, FetchError, SchemaCatalog};
pub use mock::MockCatalog;
pub use snapshot::{SchemaSnapshot, SnapshotCatalog, SnapshotColumnFamily};
pub use system::{CqlSession, SystemQueries, SystemSchemaCatalog};
