//! Migration report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A single additive schema change and the statement that applies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaChange {
    /// A missing column family is created
    CreateColumnFamily {
        column_family: String,
        statement: String,
    },

    /// A missing column is added to an existing column family
    AddColumn {
        column_family: String,
        column: String,
        column_type: String,
        statement: String,
    },
}

impl SchemaChange {
    /// The DDL statement for this change
    pub fn statement(&self) -> &str {
        match self {
            Self::CreateColumnFamily { statement, .. } | Self::AddColumn { statement, .. } => statement,
        }
    }

    /// The column family this change touches
    pub fn column_family(&self) -> &str {
        match self {
            Self::CreateColumnFamily { column_family, .. } | Self::AddColumn { column_family, .. } => column_family,
        }
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of statements
    pub total: usize,

    /// Number of column families created
    pub column_families_created: usize,

    /// Number of columns added
    pub columns_added: usize,
}

/// Migration report (report.json v1)
///
/// Lists the changes of one reconciliation pass, in the order they were
/// (or, for a dry run, would be) applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Target keyspace
    pub keyspace: String,

    /// Whether statements were only computed, not executed
    pub dry_run: bool,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Changes in application order
    pub changes: Vec<SchemaChange>,
}

impl MigrationReport {
    /// Create a new empty report
    pub fn new(keyspace: impl Into<String>, dry_run: bool) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            keyspace: keyspace.into(),
            dry_run,
            summary: ReportSummary::default(),
            changes: Vec::new(),
        }
    }

    /// Add a change to the report
    pub fn add_change(&mut self, change: SchemaChange) {
        match change {
            SchemaChange::CreateColumnFamily { .. } => self.summary.column_families_created += 1,
            SchemaChange::AddColumn { .. } => self.summary.columns_added += 1,
        }

        self.summary.total += 1;
        self.changes.push(change);
    }

    /// Statements in application order
    pub fn statements(&self) -> Vec<&str> {
        self.changes.iter().map(SchemaChange::statement).collect()
    }

    /// True when the live schema already matched
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}
