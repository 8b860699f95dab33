//! Export files: full and selected entity exports, import templates, and the
//! projects log.
//!
//! Every function here produces an [`ExportFile`] in memory; writing it out is a
//! separate step so callers decide where files land.

use crate::{
    core::{
        codec,
        record::{EntityKind, Record},
        report::NameLookup,
        store::RecordStore,
    },
    entities::project,
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::info;

/// A generated file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

impl ExportFile {
    /// Writes the file into `directory`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn write_to(&self, directory: impl AsRef<Path>) -> Result<PathBuf> {
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory)?;
        let path = directory.join(&self.filename);
        std::fs::write(&path, &self.contents)?;
        info!(path = %path.display(), bytes = self.contents.len(), "Wrote export file");
        Ok(path)
    }
}

/// Exports every stored record of `kind`. Returns `None` when there is nothing to export.
pub async fn export_entities<S: RecordStore>(store: &S, kind: EntityKind) -> Result<Option<ExportFile>> {
    let records = store.list(kind).await?;
    info!(entity = %kind, count = records.len(), "Exporting records");
    Ok(build_export(&records, format!("{}_export.csv", kind.plural())))
}

/// Exports the records of `kind` whose id is in `ids`, in listing order.
/// Returns `None` when none of the ids match.
pub async fn export_selected<S: RecordStore>(
    store: &S,
    kind: EntityKind,
    ids: &[i64],
) -> Result<Option<ExportFile>> {
    let selected: Vec<Record> = store
        .list(kind)
        .await?
        .into_iter()
        .filter(|record| record.id("id").is_some_and(|id| ids.contains(&id)))
        .collect();
    info!(entity = %kind, requested = ids.len(), matched = selected.len(), "Exporting selection");
    Ok(build_export(
        &selected,
        format!("selected_{}_export.csv", kind.plural()),
    ))
}

fn build_export(records: &[Record], filename: String) -> Option<ExportFile> {
    if records.is_empty() {
        return None;
    }
    Some(ExportFile {
        filename,
        contents: codec::to_delimited_text(records),
    })
}

/// An import template for `kind`: the importable columns plus one example row.
#[must_use]
pub fn template(kind: EntityKind) -> ExportFile {
    let example = match kind {
        EntityKind::Client => Record::new()
            .with("full_name", "Jane Smith")
            .with("username", "janesmith")
            .with("email", "jane@company.com")
            .with("phone", "+1234567890")
            .with("whatsapp_number", "+1234567890")
            .with("job_title", "VP of Product")
            .with("company_name", "Tech Solutions Inc")
            .with("industry", "Enterprise SaaS")
            .with("country", "United States")
            .with("status", "Active")
            .with("linkedin_url", "https://linkedin.com/in/janesmith")
            .with("website_url", "https://techsolutions.com")
            .with("notes", "Great client, responsive and clear requirements")
            .with("tags", strings(&["VIP", "Marketing", "New Lead"])),
        EntityKind::Doer => Record::new()
            .with("full_name", "John Doe")
            .with("email", "john@example.com")
            .with("phone", "+1234567890")
            .with("whatsapp_number", "+1234567890")
            .with("telegram_username", "@johndoe")
            .with("primary_expertise", "Full Stack Development")
            .with("availability_status", "Available")
            .with("work_arrangement", "Freelancer")
            .with("hourly_rate", Decimal::from(85))
            .with("country", "United States")
            .with("fiverr_profile", "https://fiverr.com/johndoe")
            .with("upwork_profile", "https://upwork.com/freelancers/johndoe")
            .with("skills", strings(&["Web Development", "Mobile Development"]))
            .with("technologies", strings(&["React", "Node.js", "Python"]))
            .with(
                "portfolio_links",
                strings(&["https://github.com/johndoe", "https://johndoe.dev"]),
            )
            .with("notes", "Excellent developer with great communication skills")
            .with("tags", strings(&["frontend", "react"])),
        EntityKind::Project => Record::new()
            .with("title", "Company landing page")
            .with("order_number", "FO-12345")
            .with("project_date", "2025-01-15")
            .with("deadline", "2025-01-30")
            .with("client_id", "1")
            .with("doer_id", "1")
            .with("status", "Not Started")
            .with("client_deal_amount", Decimal::from(500))
            .with("tip_amount", Decimal::from(50))
            .with("doer_cost_amount", Decimal::from(200))
            .with("deduction_amount", Decimal::ZERO)
            .with("payment_platform", "Fiverr")
            .with("payment_status", "Pending")
            .with("trello_card_url", "https://trello.com/c/abc123")
            .with("notes", "Five pages, responsive"),
    };

    ExportFile {
        filename: format!("{}_template.csv", kind.plural()),
        contents: codec::to_delimited_text(&[example]),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

const PROJECTS_LOG_HEADER: [&str; 19] = [
    "Date",
    "Order #",
    "Title",
    "Client",
    "Doer",
    "Deadline",
    "Completion Date",
    "Status",
    "Payment Status",
    "Deal Amount",
    "Tip",
    "Total Revenue",
    "Doer Cost",
    "Deductions",
    "Profit",
    "Platform",
    "Rating",
    "Trello URL",
    "Notes",
];

/// The human-facing projects log for the given (already filtered) projects.
///
/// Client and doer ids are resolved to names, dates are written as `M/D/YYYY`
/// and missing amounts as `0`. Returns `None` when there are no projects.
#[must_use]
pub fn projects_log(
    projects: &[&project::Model],
    names: &NameLookup,
    today: NaiveDate,
) -> Option<ExportFile> {
    if projects.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(projects.len() + 1);
    lines.push(PROJECTS_LOG_HEADER.join(","));
    for project in projects {
        lines.push(projects_log_row(project, names).join(","));
    }

    info!(count = projects.len(), "Exporting projects log");
    Some(ExportFile {
        filename: format!("projects_log_{}.csv", today.format("%Y-%m-%d")),
        contents: lines.join("\n"),
    })
}

fn projects_log_row(project: &project::Model, names: &NameLookup) -> Vec<String> {
    let deal = amount(project.client_deal_amount);
    let tip = amount(project.tip_amount);

    vec![
        log_date(Some(project.project_date)),
        escape(project.order_number.as_deref().unwrap_or_default()),
        escape(&project.title),
        escape(names.client_name(project.client_id)),
        escape(names.doer_name(project.doer_id)),
        log_date(project.deadline),
        log_date(project.completion_date),
        escape(&project.status),
        escape(&project.payment_status),
        number(deal),
        number(tip),
        number(deal.saturating_add(tip)),
        number(amount(project.doer_cost_amount)),
        number(amount(project.deduction_amount)),
        number(crate::core::project::profit(project)),
        escape(&project.payment_platform),
        project
            .performance_rating
            .map(|rating| number(crate::core::columns::to_decimal(rating)))
            .unwrap_or_default(),
        escape(project.trello_card_url.as_deref().unwrap_or_default()),
        format!("\"{}\"", project.notes.as_deref().unwrap_or_default().replace('"', "\"\"")),
    ]
}

fn amount(value: Option<f64>) -> Decimal {
    value.map(crate::core::columns::to_decimal).unwrap_or_default()
}

fn number(value: Decimal) -> String {
    value.normalize().to_string()
}

fn log_date(day: Option<NaiveDate>) -> String {
    day.map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_default()
}

/// Quotes a field only when it would otherwise break the row.
fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
