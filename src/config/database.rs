//! Database configuration module for `BrokerDesk`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL. Creation uses
//! `IF NOT EXISTS` and is safe to run on every start.

use crate::entities::{Client, Doer, Project};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::debug;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/brokerdesk.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back
/// to a local `SQLite` file under `data/`.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects to `database_url` and makes sure every table exists.
///
/// For file-backed `SQLite` URLs the parent directory is created first.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(parent)?;
    }

    debug!(url = database_url, "Connecting to database");
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Directory holding the database file of a `sqlite://` URL, if it has one.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}

/// Creates the clients, doers and projects tables if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Client).await?;
    create_table(db, Doer).await?;
    create_table(db, Project).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}
