//! The record store seam used by bulk import and export.
//!
//! Import and export work on [`Record`] attribute bags and an [`EntityKind`]
//! rather than on the typed models, so they can be driven by any backend. The
//! `SeaORM` connection implements it by dispatching to the per-entity modules.

use crate::{
    core::{
        client, doer,
        import::ImportPolicy,
        project,
        record::{EntityKind, Record},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

/// List/create/update/delete over attribute bags.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Every stored record of `kind`, in the entity's listing order.
    async fn list(&self, kind: EntityKind) -> Result<Vec<Record>>;

    /// Creates a record and returns it as stored.
    async fn create(&self, kind: EntityKind, fields: &Record) -> Result<Record>;

    /// Applies `fields` to an existing record and returns it as stored.
    async fn update(&self, kind: EntityKind, id: i64, fields: &Record) -> Result<Record>;

    async fn delete(&self, kind: EntityKind, id: i64) -> Result<()>;
}

impl RecordStore for DatabaseConnection {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
        let records = match kind {
            EntityKind::Client => client::list_clients(self)
                .await?
                .iter()
                .map(client::to_record)
                .collect(),
            EntityKind::Doer => doer::list_doers(self)
                .await?
                .iter()
                .map(doer::to_record)
                .collect(),
            EntityKind::Project => project::list_projects(self)
                .await?
                .iter()
                .map(project::to_record)
                .collect(),
        };
        Ok(records)
    }

    async fn create(&self, kind: EntityKind, fields: &Record) -> Result<Record> {
        match kind {
            EntityKind::Client => client::create_client(self, fields)
                .await
                .map(|model| client::to_record(&model)),
            EntityKind::Doer => doer::create_doer(self, fields)
                .await
                .map(|model| doer::to_record(&model)),
            EntityKind::Project => project::create_project(self, fields)
                .await
                .map(|model| project::to_record(&model)),
        }
    }

    async fn update(&self, kind: EntityKind, id: i64, fields: &Record) -> Result<Record> {
        match kind {
            EntityKind::Client => client::update_client(self, id, fields)
                .await
                .map(|model| client::to_record(&model)),
            EntityKind::Doer => doer::update_doer(self, id, fields)
                .await
                .map(|model| doer::to_record(&model)),
            EntityKind::Project => project::update_project(self, id, fields)
                .await
                .map(|model| project::to_record(&model)),
        }
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> Result<()> {
        match kind {
            EntityKind::Client => client::delete_client(self, id).await,
            EntityKind::Doer => doer::delete_doer(self, id).await,
            EntityKind::Project => project::delete_project(self, id).await,
        }
    }
}

/// A selected record the store could not delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub id: i64,
    pub error: String,
}

/// Outcome of deleting a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Ids removed, in selection order
    pub deleted: Vec<i64>,
    pub failures: Vec<DeleteFailure>,
    /// Ids never attempted because the stop policy halted the run
    pub skipped: Vec<i64>,
}

/// Deletes every selected record one at a time, in the given order.
///
/// Like bulk import, a failed delete is recorded and either skipped past or,
/// under [`ImportPolicy::Stop`], ends the run. Deletions already made stay made.
pub async fn delete_records<S: RecordStore>(
    store: &S,
    kind: EntityKind,
    ids: &[i64],
    policy: ImportPolicy,
) -> DeleteReport {
    let mut report = DeleteReport::default();
    info!(entity = %kind, count = ids.len(), ?policy, "Deleting selection");

    for (index, &id) in ids.iter().enumerate() {
        match store.delete(kind, id).await {
            Ok(()) => report.deleted.push(id),
            Err(e) => {
                warn!(entity = %kind, id, error = %e, "Could not delete record");
                report.failures.push(DeleteFailure {
                    id,
                    error: e.to_string(),
                });
                if policy == ImportPolicy::Stop {
                    report.skipped = ids[index + 1..].to_vec();
                    break;
                }
            }
        }
    }

    info!(
        entity = %kind,
        deleted = report.deleted.len(),
        failed = report.failures.len(),
        skipped = report.skipped.len(),
        "Delete finished"
    );
    report
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_store_round_trip_for_projects() -> Result<()> {
        let db = setup_test_db().await?;

        let created = db
            .create(
                EntityKind::Project,
                &project_fields("Logo", 1, 2)
                    .with("client_deal_amount", "100")
                    .with("payment_platform", "Upwork"),
            )
            .await?;
        let id = created.id("id").unwrap();
        assert_eq!(created.decimal("profit_margin"), Some(dec!(90)));

        let updated = db
            .update(
                EntityKind::Project,
                id,
                &Record::new().with("doer_cost_amount", "40"),
            )
            .await?;
        assert_eq!(updated.decimal("profit_margin"), Some(dec!(50)));

        assert_eq!(db.list(EntityKind::Project).await?.len(), 1);
        db.delete(EntityKind::Project, id).await?;
        assert!(db.list(EntityKind::Project).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_store_lists_each_kind() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_client(&db, "Jane").await?;
        create_test_doer(&db, "John").await?;
        create_test_doer(&db, "Jim").await?;

        assert_eq!(db.list(EntityKind::Client).await?.len(), 1);
        assert_eq!(db.list(EntityKind::Doer).await?.len(), 2);
        assert!(db.list(EntityKind::Project).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_store_delete_missing() -> Result<()> {
        let db = setup_test_db().await?;
        let result = db.delete(EntityKind::Doer, 7).await;
        assert!(matches!(
            result,
            Err(Error::RecordNotFound {
                entity: "doer",
                id: 7
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_records_continues_past_missing_ids() -> Result<()> {
        let db = setup_test_db().await?;
        let jane = create_test_client(&db, "Jane").await?;
        let acme = create_test_client(&db, "Acme").await?;
        let kept = create_test_client(&db, "Kept").await?;

        let report = delete_records(
            &db,
            EntityKind::Client,
            &[jane.id, 999, acme.id],
            ImportPolicy::Continue,
        )
        .await;

        assert_eq!(report.deleted, vec![jane.id, acme.id]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].id, 999);
        assert!(report.skipped.is_empty());

        let remaining = db.list(EntityKind::Client).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id("id"), Some(kept.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_records_stop_policy() -> Result<()> {
        let db = setup_test_db().await?;
        let john = create_test_doer(&db, "John").await?;
        let jim = create_test_doer(&db, "Jim").await?;

        let report =
            delete_records(&db, EntityKind::Doer, &[999, john.id, jim.id], ImportPolicy::Stop).await;

        assert!(report.deleted.is_empty());
        assert_eq!(report.failures[0].id, 999);
        assert_eq!(report.skipped, vec![john.id, jim.id]);
        assert_eq!(db.list(EntityKind::Doer).await?.len(), 2);

        Ok(())
    }
}
