//! Test fixtures for migration integration tests
//!
//! Column family definitions modelled on a typical application keyspace.

use cqlmigrate_core::{Column, ColumnFamily, Keyspace, Order};

/// Users keyed by id
pub fn users() -> ColumnFamily {
    ColumnFamily::new()
        .with_column(Column::primary_key("id", "uuid"))
        .with_column(Column::new("name", "text"))
        .with_column(Column::new("email", "text"))
}

/// Time series of events per id, newest first
pub fn events() -> ColumnFamily {
    ColumnFamily::new()
        .with_column(Column::primary_key("id", "uuid"))
        .with_column(Column::primary_key("ts", "timestamp"))
        .with_column(Column::new("payload", "text"))
        .with_partition_key(["id"])
        .with_clustering_order(vec![Order::desc("ts")])
}

/// Messages partitioned by tenant and day bucket
pub fn messages() -> ColumnFamily {
    ColumnFamily::new()
        .with_column(Column::primary_key("tenant", "text"))
        .with_column(Column::primary_key("day", "date"))
        .with_column(Column::primary_key("sent_at", "timeuuid"))
        .with_column(Column::new("body", "text"))
        .with_column(Column::new("headers", "map<text, text>"))
        .with_partition_key(["tenant", "day"])
        .with_clustering_order(vec![Order::desc("sent_at")])
}

/// Keyspace with all fixture column families
pub fn app_keyspace() -> Keyspace {
    Keyspace::new()
        .with_column_family("users", users())
        .with_column_family("events", events())
        .with_column_family("messages", messages())
}
