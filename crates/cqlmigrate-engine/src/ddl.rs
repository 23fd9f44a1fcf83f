//! DDL synthesis for column families
//!
//! Pure string builders: no I/O, and the output depends only on the input
//! definition (columns are emitted in declaration order).

use cqlmigrate_core::{Column, ColumnFamily, SchemaError};

/// Quote an identifier using CQL double-quote rules
///
/// Embedded double quotes are doubled.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build the `CREATE COLUMNFAMILY` statement for a column family
///
/// Fails with [`SchemaError::NoColumnsDefined`] when there are no columns,
/// with [`SchemaError::DuplicateColumn`] when a column name repeats and
/// with [`SchemaError::NoPrimaryKey`] when no column is part of the key.
///
/// The column family name is quoted, so it is stored case-sensitively.
/// [`add_column`] leaves the name unquoted and the server folds it to
/// lowercase: a name with uppercase letters can be created here but never
/// altered afterwards. Keep column family names lowercase.
///
/// # Example
///
/// ```rust,ignore
/// let cf = ColumnFamily::new()
///     .with_column(Column::primary_key("id", "uuid"))
///     .with_column(Column::new("name", "text"));
///
/// assert_eq!(
///     create_column_family("users", &cf)?,
///     r#"CREATE COLUMNFAMILY "users" ("id" uuid, "name" text, PRIMARY KEY ("id"))"#
/// );
/// ```
pub fn create_column_family(name: &str, column_family: &ColumnFamily) -> Result<String, SchemaError> {
    column_family.validate(name)?;

    let columns: Vec<String> = column_family
        .columns
        .iter()
        .map(|c| format!("{} {}", quote_identifier(&c.name), c.column_type))
        .collect();

    let mut cql = format!(
        "CREATE COLUMNFAMILY {} ({}, PRIMARY KEY ({}))",
        quote_identifier(name),
        columns.join(", "),
        primary_key_clause(column_family)
    );

    if !column_family.clustering_order.is_empty() {
        let ordering: Vec<String> = column_family
            .clustering_order
            .iter()
            .map(|o| format!("{} {}", quote_identifier(&o.column), o.direction))
            .collect();

        cql.push_str(&format!(" WITH CLUSTERING ORDER BY ({})", ordering.join(", ")));
    }

    Ok(cql)
}

/// Build the `ALTER TABLE ... ADD` statement for one missing column
///
/// The column family name is emitted unquoted and therefore matches only
/// lowercase names; see [`create_column_family`].
pub fn add_column(column_family_name: &str, column: &Column) -> String {
    format!(
        "ALTER TABLE {} ADD {} {}",
        column_family_name,
        quote_identifier(&column.name),
        column.column_type
    )
}

/// Contents of `PRIMARY KEY (...)`
///
/// With an explicit partition key the partition columns form the first,
/// parenthesized group and the remaining key columns follow as clustering
/// columns. Otherwise every key column is listed flat.
fn primary_key_clause(column_family: &ColumnFamily) -> String {
    let key_columns = column_family.primary_key_columns();

    if column_family.partition_key.is_empty() {
        return key_columns
            .map(|c| quote_identifier(&c.name))
            .collect::<Vec<_>>()
            .join(", ");
    }

    let partition: Vec<String> = column_family
        .partition_key
        .iter()
        .map(|name| quote_identifier(name))
        .collect();

    let mut parts = vec![format!("({})", partition.join(", "))];
    parts.extend(
        key_columns
            .filter(|c| !column_family.partition_key.contains(&c.name))
            .map(|c| quote_identifier(&c.name)),
    );

    parts.join(", ")
}
