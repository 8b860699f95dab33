//! Client entity - Customers that commission projects.
//!
//! Clients are flat profiles: contact channels, company details, a status label
//! and free-form tags.

use super::StringList;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Contact name (required)
    pub full_name: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    /// Relationship status, e.g. "Active", "Potential", "Preferred", "Archived"
    pub status: String,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
    pub fiverr_profile: Option<String>,
    pub upwork_profile: Option<String>,
    pub notes: Option<String>,
    /// Free-form labels used for filtering
    pub tags: StringList,
    /// Pinned in the directory
    pub is_favorite: bool,
    /// When the client was created
    pub created_at: DateTime,
    /// When the client was last modified
    pub updated_at: DateTime,
}

/// `Client` has no enforced relationships; projects reference clients by id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
