//! Project business logic - Handles all project-related operations.
//!
//! Every save recomputes `profit_margin` from the merged amounts and payment
//! platform before the row is written, so the stored margin always matches the
//! formula in [`crate::core::finance`]. A `profit_margin` supplied by the caller
//! is ignored. Client and doer references are stored as given; nothing checks
//! that they exist.

use crate::{
    core::{
        columns::{
            assign_amount, assign_date, assign_id, assign_required_text, assign_text, date,
            opt_amount, opt_date, opt_text, require_date, require_id, require_text, timestamp,
            to_decimal,
        },
        finance::{self, ProfitInput},
        record::Record,
        status::ProjectStatus,
    },
    entities::{Project, project},
    errors::{Error, Result},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sea_orm::{QueryOrder, Set, prelude::*};

const ENTITY: &str = "project";

/// Retrieves all projects, most recent project date first.
pub async fn list_projects(db: &DatabaseConnection) -> Result<Vec<project::Model>> {
    Project::find()
        .order_by_desc(project::Column::ProjectDate)
        .order_by_desc(project::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a project by its unique ID.
pub async fn get_project_by_id(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Option<project::Model>> {
    Project::find_by_id(project_id).one(db).await.map_err(Into::into)
}

/// Retrieves the projects linked to a client, most recent first.
pub async fn get_projects_for_client(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Vec<project::Model>> {
    Project::find()
        .filter(project::Column::ClientId.eq(client_id))
        .order_by_desc(project::Column::ProjectDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the projects linked to a doer, most recent first.
pub async fn get_projects_for_doer(
    db: &DatabaseConnection,
    doer_id: i64,
) -> Result<Vec<project::Model>> {
    Project::find()
        .filter(project::Column::DoerId.eq(doer_id))
        .order_by_desc(project::Column::ProjectDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a project and derives its profit margin.
///
/// Status defaults to "Potential", payment platform to "PayPal" and payment
/// status to "Pending".
///
/// # Errors
/// Returns an error if `title`, `project_date`, `client_id` or `doer_id` is
/// missing, or if the insert fails.
pub async fn create_project(db: &DatabaseConnection, fields: &Record) -> Result<project::Model> {
    let title = require_text(fields, ENTITY, "title")?;
    let project_date = require_date(fields, ENTITY, "project_date")?;
    let client_id = require_id(fields, ENTITY, "client_id")?;
    let doer_id = require_id(fields, ENTITY, "doer_id")?;
    let now = chrono::Utc::now().naive_utc();

    let mut project = project::ActiveModel {
        title: Set(title),
        order_number: Set(None),
        project_date: Set(project_date),
        deadline: Set(None),
        completion_date: Set(None),
        completed_at: Set(None),
        trello_card_url: Set(None),
        status: Set(ProjectStatus::Potential.label().to_string()),
        client_deal_amount: Set(None),
        tip_amount: Set(None),
        doer_cost_amount: Set(None),
        deduction_amount: Set(None),
        payment_platform: Set(finance::PaymentPlatform::PayPal.label().to_string()),
        payment_status: Set("Pending".to_string()),
        performance_rating: Set(None),
        profit_margin: Set(0.0),
        client_id: Set(client_id),
        doer_id: Set(doer_id),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    apply_fields(&mut project, fields);
    stamp_completion(&mut project, now);
    recompute_profit(&mut project);

    project.insert(db).await.map_err(Into::into)
}

/// Applies the attributes present in `fields` to an existing project and
/// recomputes its profit margin from the merged values.
///
/// # Errors
/// Returns an error if the project does not exist or the update fails.
pub async fn update_project(
    db: &DatabaseConnection,
    project_id: i64,
    fields: &Record,
) -> Result<project::Model> {
    let mut project: project::ActiveModel = get_project_by_id(db, project_id)
        .await?
        .ok_or(Error::RecordNotFound {
            entity: ENTITY,
            id: project_id,
        })?
        .into();

    let now = chrono::Utc::now().naive_utc();
    apply_fields(&mut project, fields);
    stamp_completion(&mut project, now);
    recompute_profit(&mut project);
    project.updated_at = Set(now);

    project.update(db).await.map_err(Into::into)
}

/// Permanently deletes a project.
///
/// # Errors
/// Returns an error if the project does not exist or the delete fails.
pub async fn delete_project(db: &DatabaseConnection, project_id: i64) -> Result<()> {
    let result = Project::delete_by_id(project_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            entity: ENTITY,
            id: project_id,
        });
    }
    Ok(())
}

fn apply_fields(project: &mut project::ActiveModel, fields: &Record) {
    assign_required_text(fields, "title", &mut project.title);
    assign_text(fields, "order_number", &mut project.order_number);
    if let Some(day) = date(fields, "project_date") {
        project.project_date = Set(day);
    }
    assign_date(fields, "deadline", &mut project.deadline);
    assign_date(fields, "completion_date", &mut project.completion_date);
    assign_text(fields, "trello_card_url", &mut project.trello_card_url);
    assign_required_text(fields, "status", &mut project.status);
    assign_amount(fields, "client_deal_amount", &mut project.client_deal_amount);
    assign_amount(fields, "tip_amount", &mut project.tip_amount);
    assign_amount(fields, "doer_cost_amount", &mut project.doer_cost_amount);
    assign_amount(fields, "deduction_amount", &mut project.deduction_amount);
    assign_required_text(fields, "payment_platform", &mut project.payment_platform);
    assign_required_text(fields, "payment_status", &mut project.payment_status);
    assign_amount(fields, "performance_rating", &mut project.performance_rating);
    assign_id(fields, "client_id", &mut project.client_id);
    assign_id(fields, "doer_id", &mut project.doer_id);
    assign_text(fields, "notes", &mut project.notes);
}

/// Records when a project first reaches "Completed".
fn stamp_completion(project: &mut project::ActiveModel, now: chrono::NaiveDateTime) {
    let completed = project.status.as_ref() == ProjectStatus::Completed.label();
    if completed && project.completed_at.as_ref().is_none() {
        project.completed_at = Set(Some(now));
    }
}

fn recompute_profit(project: &mut project::ActiveModel) {
    let input = ProfitInput {
        client_deal_amount: (*project.client_deal_amount.as_ref()).map(to_decimal),
        tip_amount: (*project.tip_amount.as_ref()).map(to_decimal),
        doer_cost_amount: (*project.doer_cost_amount.as_ref()).map(to_decimal),
        deduction_amount: (*project.deduction_amount.as_ref()).map(to_decimal),
        payment_platform: project.payment_platform.as_ref().clone(),
    };
    let profit = finance::compute_profit_margin(&input);
    project.profit_margin = Set(profit.to_f64().unwrap_or_default());
}

/// Profit input for a stored project.
#[must_use]
pub fn profit_input(project: &project::Model) -> ProfitInput {
    ProfitInput {
        client_deal_amount: project.client_deal_amount.map(to_decimal),
        tip_amount: project.tip_amount.map(to_decimal),
        doer_cost_amount: project.doer_cost_amount.map(to_decimal),
        deduction_amount: project.deduction_amount.map(to_decimal),
        payment_platform: project.payment_platform.clone(),
    }
}

/// Deal plus tip for a stored project.
#[must_use]
pub fn revenue(project: &project::Model) -> Decimal {
    project
        .client_deal_amount
        .map(to_decimal)
        .unwrap_or_default()
        .saturating_add(project.tip_amount.map(to_decimal).unwrap_or_default())
}

/// Stored profit margin as a decimal.
#[must_use]
pub fn profit(project: &project::Model) -> Decimal {
    to_decimal(project.profit_margin)
}

/// Converts a project row into an export record, one attribute per column.
#[must_use]
pub fn to_record(project: &project::Model) -> Record {
    Record::new()
        .with("id", project.id.to_string())
        .with("title", project.title.as_str())
        .with("order_number", opt_text(project.order_number.as_ref()))
        .with("project_date", opt_date(Some(project.project_date)))
        .with("deadline", opt_date(project.deadline))
        .with("completion_date", opt_date(project.completion_date))
        .with(
            "completed_at",
            project.completed_at.map_or_else(|| "".into(), timestamp),
        )
        .with("trello_card_url", opt_text(project.trello_card_url.as_ref()))
        .with("status", project.status.as_str())
        .with("client_deal_amount", opt_amount(project.client_deal_amount))
        .with("tip_amount", opt_amount(project.tip_amount))
        .with("doer_cost_amount", opt_amount(project.doer_cost_amount))
        .with("deduction_amount", opt_amount(project.deduction_amount))
        .with("payment_platform", project.payment_platform.as_str())
        .with("payment_status", project.payment_status.as_str())
        .with("performance_rating", opt_amount(project.performance_rating))
        .with("profit_margin", profit(project))
        .with("client_id", project.client_id.to_string())
        .with("doer_id", project.doer_id.to_string())
        .with("notes", opt_text(project.notes.as_ref()))
        .with("created_at", timestamp(project.created_at))
}
