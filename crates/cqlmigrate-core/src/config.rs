//! Configuration schema (cqlmigrate.toml)

use crate::schema::Keyspace;
use serde::{Deserialize, Serialize};

/// Layout of the system tables used for schema introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemSchemaVersion {
    /// `system.schema_columnfamilies` / `system.schema_columns` (Cassandra 2.x)
    Legacy,

    /// `system_schema.tables` / `system_schema.columns` (Cassandra 3.0+, Scylla)
    #[default]
    Modern,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Target keyspace name
    pub keyspace: String,

    /// System table layout of the target cluster
    #[serde(default)]
    pub system_schema: SystemSchemaVersion,

    /// Desired column families, in declaration order
    #[serde(default)]
    pub column_families: Keyspace,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: std::path::PathBuf,
}

impl Config {
    /// Create a config for a keyspace with no column families
    pub fn new(keyspace: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            system_schema: SystemSchemaVersion::default(),
            column_families: Keyspace::new(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Resolve a path relative to the project root
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve_path(&self, path: &std::path::Path) -> std::path::PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnFamily, Direction};

    const SAMPLE: &str = r#"
keyspace = "app"
system_schema = "legacy"

[column_families.users]
columns = [
  { name = "id", type = "uuid", primary_key = true },
  { name = "email", type = "text" },
]

[column_families.events]
partition_key = ["id", "bucket"]
clustering_order = [{ column = "ts", direction = "desc" }]
columns = [
  { name = "id", type = "uuid", primary_key = true },
  { name = "bucket", type = "int", primary_key = true },
  { name = "ts", type = "timestamp", primary_key = true },
  { name = "payload", type = "map<text, text>" },
]
"#;

    #[test]
    fn parse_sample_config() {
        let config = Config::from_toml(SAMPLE).unwrap();

        assert_eq!(config.keyspace, "app");
        assert_eq!(config.system_schema, SystemSchemaVersion::Legacy);
        assert_eq!(config.column_families.names(), vec!["users", "events"]);

        let events = config.column_families.get("events").unwrap();
        assert_eq!(events.partition_key, vec!["id", "bucket"]);
        assert_eq!(events.clustering_order[0].direction, Direction::Desc);
        assert_eq!(events.find_column("payload").unwrap().column_type, "map<text, text>");
        assert!(config.column_families.get("users").unwrap().clustering_order.is_empty());
    }

    #[test]
    fn system_schema_defaults_to_modern() {
        let config = Config::from_toml("keyspace = \"app\"").unwrap();
        assert_eq!(config.system_schema, SystemSchemaVersion::Modern);
        assert!(config.column_families.is_empty());
    }

    #[test]
    fn missing_keyspace_is_a_parse_error() {
        let result = Config::from_toml("system_schema = \"modern\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cqlmigrate.toml");

        let mut config = Config::new("app");
        config.column_families.insert(
            "users",
            ColumnFamily::new()
                .with_column(Column::primary_key("id", "uuid"))
                .with_column(Column::new("email", "text")),
        );
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.keyspace, "app");
        assert_eq!(loaded.column_families, config.column_families);
        assert_eq!(loaded.project_root, dir.path());
    }

    #[test]
    fn relative_paths_resolve_against_project_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cqlmigrate.toml");
        Config::new("app").save_to_file(&path).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config.resolve_path(std::path::Path::new("live.json")),
            dir.path().join("live.json")
        );
        assert_eq!(
            config.resolve_path(std::path::Path::new("/tmp/live.json")),
            std::path::PathBuf::from("/tmp/live.json")
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Config::from_file(std::path::Path::new("/nonexistent/cqlmigrate.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
