//! Bulk import of delimited text through a [`RecordStore`].
//!
//! Rows are created one at a time, in file order, each awaited before the next.
//! Imports are not transactional: rows created before a failure or a
//! cancellation stay created.

use crate::core::{
    codec,
    record::{EntityKind, Record},
    store::RecordStore,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// What to do when the store rejects a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Record the failure and carry on with the next row
    #[default]
    Continue,
    /// Stop after the first failed row
    Stop,
}

/// A row the store refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based data row number, not counting the header
    pub row: usize,
    pub error: String,
}

/// Outcome of one bulk import.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Data rows parsed from the file
    pub total_rows: usize,
    /// Records as the store returned them, in file order
    pub created: Vec<Record>,
    pub failures: Vec<RowFailure>,
    /// Set when the token was cancelled before every row was attempted
    pub cancelled: bool,
}

impl ImportReport {
    /// Rows never attempted because of cancellation or the stop policy.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.total_rows - self.created.len() - self.failures.len()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

/// Parses `text` and creates one `kind` record per data row.
///
/// Store errors never abort the call; they are collected in the report. The
/// token is checked before each row.
pub async fn import_records<S: RecordStore>(
    store: &S,
    kind: EntityKind,
    text: &str,
    policy: ImportPolicy,
    cancel: &CancellationToken,
) -> ImportReport {
    let rows = codec::from_delimited_text(text);
    let mut report = ImportReport {
        total_rows: rows.len(),
        ..ImportReport::default()
    };
    info!(entity = %kind, rows = report.total_rows, ?policy, "Importing records");

    for (index, fields) in rows.iter().enumerate() {
        if cancel.is_cancelled() {
            report.cancelled = true;
            warn!(entity = %kind, row = index + 1, "Import cancelled");
            break;
        }

        match store.create(kind, fields).await {
            Ok(record) => report.created.push(record),
            Err(e) => {
                warn!(entity = %kind, row = index + 1, error = %e, "Rejected import row");
                report.failures.push(RowFailure {
                    row: index + 1,
                    error: e.to_string(),
                });
                if policy == ImportPolicy::Stop {
                    break;
                }
            }
        }
    }

    info!(
        entity = %kind,
        created = report.created.len(),
        failed = report.failures.len(),
        skipped = report.skipped(),
        "Import finished"
    );
    report
}
