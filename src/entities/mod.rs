//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod client;
pub mod doer;
pub mod project;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

// Re-export specific types to avoid conflicts
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use doer::{Column as DoerColumn, Entity as Doer, Model as DoerModel};
pub use project::{Column as ProjectColumn, Entity as Project, Model as ProjectModel};

/// List-valued column (skills, tags, ...) stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}
