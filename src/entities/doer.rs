//! Doer entity - Freelancers who carry out projects.
//!
//! Besides contact details, a doer carries rates, an availability label and
//! three list-valued columns (skills, technologies, portfolio links) plus tags.

use super::StringList;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Doer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "doers")]
pub struct Model {
    /// Unique identifier for the doer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (required)
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub telegram_username: Option<String>,
    /// Main area of work (required), e.g. "Full Stack Development"
    pub primary_expertise: String,
    /// "Available", "Busy", "On Project" or "Archived"
    pub availability_status: String,
    pub work_arrangement: Option<String>,
    /// Hourly rate in dollars
    pub hourly_rate: Option<f64>,
    /// Flat per-project rate in dollars
    pub project_rate: Option<f64>,
    /// Internal quality rating
    pub rating: Option<f64>,
    pub country: Option<String>,
    pub fiverr_profile: Option<String>,
    pub upwork_profile: Option<String>,
    pub notes: Option<String>,
    pub skills: StringList,
    pub technologies: StringList,
    pub portfolio_links: StringList,
    pub tags: StringList,
    /// Pinned in the directory
    pub is_favorite: bool,
    /// When the doer was created
    pub created_at: DateTime,
    /// When the doer was last modified
    pub updated_at: DateTime,
}

/// `Doer` has no enforced relationships; projects reference doers by id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
