//! Project entity - A unit of work linking one client and one doer.
//!
//! Amounts are stored in dollars. `profit_margin` is derived from the amounts and
//! the payment platform every time a project is saved; it is never written from
//! caller input. `client_id` and `doer_id` are plain references without foreign
//! keys, so a project may outlive the records it points at.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short description of the work (required)
    pub title: String,
    /// Marketplace order number, if any
    pub order_number: Option<String>,
    /// Date the project was agreed (required)
    pub project_date: Date,
    pub deadline: Option<Date>,
    pub completion_date: Option<Date>,
    /// Set automatically the first time the project is saved as "Completed"
    pub completed_at: Option<DateTime>,
    pub trello_card_url: Option<String>,
    /// Lifecycle label; does not affect the financial formula
    pub status: String,
    /// Agreed price with the client
    pub client_deal_amount: Option<f64>,
    /// Voluntary extra payment from the client
    pub tip_amount: Option<f64>,
    /// Amount paid to the doer
    pub doer_cost_amount: Option<f64>,
    /// Manual adjustment (refund, chargeback)
    pub deduction_amount: Option<f64>,
    /// "Fiverr", "Upwork", "PayPal" or "Other"
    pub payment_platform: String,
    /// "Pending", "Paid" or "Waiting for Payment"
    pub payment_status: String,
    /// Rating given to the doer for this project
    pub performance_rating: Option<f64>,
    /// Derived net profit; see `core::finance`
    pub profit_margin: f64,
    /// Referenced client (not enforced)
    pub client_id: i64,
    /// Referenced doer (not enforced)
    pub doer_id: i64,
    pub notes: Option<String>,
    /// When the project was created
    pub created_at: DateTime,
    /// When the project was last modified
    pub updated_at: DateTime,
}

/// `Project` references clients and doers by id without enforced relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
