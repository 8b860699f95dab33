//! Report generation business logic.
//!
//! This module resolves client and doer names for project listings, flags late
//! projects, and aggregates the revenue and profit figures shown above the
//! projects log. All functions return structured data that the binary formats.

use crate::{
    core::{
        client, doer, project,
        status::{ProjectStatus, StatusGroup},
    },
    entities::{client as client_entity, doer as doer_entity, project as project_entity},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;

/// Shown wherever a project points at a client or doer that no longer exists.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Resolves client and doer ids to display names.
#[derive(Debug, Clone, Default)]
pub struct NameLookup {
    clients: HashMap<i64, String>,
    doers: HashMap<i64, String>,
}

impl NameLookup {
    #[must_use]
    pub fn new(clients: &[client_entity::Model], doers: &[doer_entity::Model]) -> Self {
        Self {
            clients: clients.iter().map(|c| (c.id, c.full_name.clone())).collect(),
            doers: doers.iter().map(|d| (d.id, d.full_name.clone())).collect(),
        }
    }

    /// Loads every client and doer.
    pub async fn load(db: &DatabaseConnection) -> Result<Self> {
        let clients = client::list_clients(db).await?;
        let doers = doer::list_doers(db).await?;
        Ok(Self::new(&clients, &doers))
    }

    #[must_use]
    pub fn client_name(&self, client_id: i64) -> &str {
        display_name(self.clients.get(&client_id))
    }

    #[must_use]
    pub fn doer_name(&self, doer_id: i64) -> &str {
        display_name(self.doers.get(&doer_id))
    }
}

fn display_name(name: Option<&String>) -> &str {
    name.map(String::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_NAME)
}

/// A project is late when its deadline is before `today` and it is not completed.
#[must_use]
pub fn is_project_late(project: &project_entity::Model, today: NaiveDate) -> bool {
    if project.status == ProjectStatus::Completed.label() {
        return false;
    }
    project.deadline.is_some_and(|deadline| deadline < today)
}

/// Headline figures for a set of projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetrics {
    pub total_projects: usize,
    /// Deal amounts plus tips
    pub total_revenue: Decimal,
    /// Sum of stored profit margins
    pub total_profit: Decimal,
    pub late_projects: usize,
    pub potential: usize,
    pub active: usize,
    pub blocked: usize,
    pub completed: usize,
}

impl ProjectMetrics {
    /// Aggregates `projects`. Statuses outside the known set count toward the
    /// total but toward no group.
    #[must_use]
    pub fn from_projects(projects: &[project_entity::Model], today: NaiveDate) -> Self {
        let mut metrics = Self {
            total_projects: projects.len(),
            ..Self::default()
        };

        for p in projects {
            metrics.total_revenue = metrics.total_revenue.saturating_add(project::revenue(p));
            metrics.total_profit = metrics.total_profit.saturating_add(project::profit(p));
            if is_project_late(p, today) {
                metrics.late_projects += 1;
            }
            match ProjectStatus::from_label(&p.status).map(ProjectStatus::group) {
                Some(StatusGroup::Potential) => metrics.potential += 1,
                Some(StatusGroup::Active) => metrics.active += 1,
                Some(StatusGroup::Blocked) => metrics.blocked += 1,
                Some(StatusGroup::Completed) => metrics.completed += 1,
                None => {}
            }
        }

        metrics
    }
}

/// Formats a dollar amount like "$1250.00" or "-$40.00".
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let amount = amount.round_dp(2);
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Multi-line summary of project metrics for terminal output.
#[must_use]
pub fn format_metrics(metrics: &ProjectMetrics) -> String {
    format!(
        "Projects: {} (late: {})\n\
         Potential: {} | Active: {} | Blocked: {} | Completed: {}\n\
         Revenue: {}\n\
         Profit: {}",
        metrics.total_projects,
        metrics.late_projects,
        metrics.potential,
        metrics.active,
        metrics.blocked,
        metrics.completed,
        format_currency(metrics.total_revenue),
        format_currency(metrics.total_profit),
    )
}
