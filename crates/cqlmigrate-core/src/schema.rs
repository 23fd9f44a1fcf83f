//! Desired-state schema model
//!
//! Column families keep their columns as an ordered sequence so that every
//! statement derived from them is reproducible. Name lookups are derived on
//! demand instead of being stored.

use crate::error::SchemaError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A column in a column family
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// CQL type name, emitted verbatim (e.g. `uuid`, `map<text, int>`)
    #[serde(rename = "type")]
    pub column_type: String,

    /// Whether the column is part of the primary key
    #[serde(default)]
    pub primary_key: bool,
}

impl Column {
    /// Create a regular (non key) column
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            primary_key: false,
        }
    }

    /// Create a primary key column
    pub fn primary_key(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self::new(name, column_type).with_primary_key(true)
    }

    /// Set primary key membership
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }
}

/// Sort direction of a clustering column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Ascending order
    #[serde(alias = "asc")]
    Asc,

    /// Descending order
    #[serde(alias = "desc")]
    Desc,
}

impl Direction {
    /// CQL keyword for this direction
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Clustering order entry
///
/// The referenced column is expected to be a primary key column of the
/// owning column family. This is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// Clustering column name
    pub column: String,

    /// Sort direction
    pub direction: Direction,
}

impl Order {
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Desc)
    }
}

/// A column family definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFamily {
    /// Ordered list of columns
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Clustering order, in declaration order
    #[serde(default)]
    pub clustering_order: Vec<Order>,

    /// Explicit partition key columns
    ///
    /// When empty, every primary key column forms a flat key in column order.
    #[serde(default)]
    pub partition_key: Vec<String>,
}

impl ColumnFamily {
    /// Create an empty column family
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Append several columns
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Set the explicit partition key
    pub fn with_partition_key<I, S>(mut self, partition_key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partition_key = partition_key.into_iter().map(Into::into).collect();
        self
    }

    /// Set the clustering order
    pub fn with_clustering_order(mut self, clustering_order: Vec<Order>) -> Self {
        self.clustering_order = clustering_order;
        self
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Index columns by name
    pub fn columns_by_name(&self) -> HashMap<&str, &Column> {
        self.columns.iter().map(|c| (c.name.as_str(), c)).collect()
    }

    /// Get column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Primary key columns in declaration order
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// First column name declared more than once
    pub fn duplicate_column(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .find(|name| !seen.insert(*name))
    }

    /// Reject column names declared more than once
    pub fn check_column_names(&self, name: &str) -> Result<(), SchemaError> {
        match self.duplicate_column() {
            Some(column) => Err(SchemaError::DuplicateColumn {
                column_family: name.to_string(),
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Check that the definition can be turned into a CREATE statement
    ///
    /// Reports missing columns, then duplicate names, then a missing primary key.
    pub fn validate(&self, name: &str) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::NoColumnsDefined {
                column_family: name.to_string(),
            });
        }

        self.check_column_names(name)?;

        if self.primary_key_columns().next().is_none() {
            return Err(SchemaError::NoPrimaryKey {
                column_family: name.to_string(),
            });
        }

        Ok(())
    }
}

/// Desired keyspace: column family name to definition, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyspace {
    column_families: IndexMap<String, ColumnFamily>,
}

impl Keyspace {
    /// Create an empty keyspace
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column family, builder style
    pub fn with_column_family(mut self, name: impl Into<String>, column_family: ColumnFamily) -> Self {
        self.insert(name, column_family);
        self
    }

    /// Add or replace a column family
    ///
    /// Replacing keeps the original declaration position.
    pub fn insert(&mut self, name: impl Into<String>, column_family: ColumnFamily) -> Option<ColumnFamily> {
        self.column_families.insert(name.into(), column_family)
    }

    /// Look up a column family
    pub fn get(&self, name: &str) -> Option<&ColumnFamily> {
        self.column_families.get(name)
    }

    /// Whether a column family is declared
    pub fn contains(&self, name: &str) -> bool {
        self.column_families.contains_key(name)
    }

    /// Column family names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.column_families.keys().map(String::as_str).collect()
    }

    /// Iterate over `(name, definition)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnFamily)> {
        self.column_families.iter().map(|(name, cf)| (name.as_str(), cf))
    }

    pub fn len(&self) -> usize {
        self.column_families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column_families.is_empty()
    }

    /// Validate every column family, stopping at the first invalid one
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.iter().try_for_each(|(name, cf)| cf.validate(name))
    }

    /// Reject duplicate column names in any column family
    ///
    /// Unlike `validate`, partial definitions without a primary key pass.
    pub fn check_column_names(&self) -> Result<(), SchemaError> {
        self.iter().try_for_each(|(name, cf)| cf.check_column_names(name))
    }
}

impl FromIterator<(String, ColumnFamily)> for Keyspace {
    fn from_iter<T: IntoIterator<Item = (String, ColumnFamily)>>(iter: T) -> Self {
        Self {
            column_families: iter.into_iter().collect(),
        }
    }
}
