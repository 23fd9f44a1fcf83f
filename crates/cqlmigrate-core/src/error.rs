//! Schema definition errors

/// A desired column family cannot be turned into DDL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("No columns defined for column family: {column_family}")]
    NoColumnsDefined { column_family: String },

    #[error("Column family defines no primary keys: {column_family}")]
    NoPrimaryKey { column_family: String },

    #[error("Column {column} declared more than once in column family: {column_family}")]
    DuplicateColumn { column_family: String, column: String },
}

impl SchemaError {
    /// Column family the error refers to
    pub fn column_family(&self) -> &str {
        match self {
            Self::NoColumnsDefined { column_family }
            | Self::NoPrimaryKey { column_family }
            | Self::DuplicateColumn { column_family, .. } => column_family,
        }
    }
}
