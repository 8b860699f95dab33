//! Shared test utilities for `BrokerDesk`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{client, doer, project, record::Record},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test client with only a name; everything else takes the defaults.
pub async fn create_test_client(
    db: &DatabaseConnection,
    full_name: &str,
) -> Result<entities::client::Model> {
    client::create_client(db, &Record::new().with("full_name", full_name)).await
}

/// Creates a test doer.
///
/// # Defaults
/// * `primary_expertise`: "Web Development"
pub async fn create_test_doer(
    db: &DatabaseConnection,
    full_name: &str,
) -> Result<entities::doer::Model> {
    doer::create_doer(
        db,
        &Record::new()
            .with("full_name", full_name)
            .with("primary_expertise", "Web Development"),
    )
    .await
}

/// The minimum attributes a project needs.
///
/// # Defaults
/// * `project_date`: "2025-01-15"
#[must_use]
pub fn project_fields(title: &str, client_id: i64, doer_id: i64) -> Record {
    Record::new()
        .with("title", title)
        .with("project_date", "2025-01-15")
        .with("client_id", client_id.to_string())
        .with("doer_id", doer_id.to_string())
}

/// Creates a test project pointing at client 1 and doer 1, with no amounts.
pub async fn create_test_project(
    db: &DatabaseConnection,
    title: &str,
) -> Result<entities::project::Model> {
    project::create_project(db, &project_fields(title, 1, 1)).await
}
