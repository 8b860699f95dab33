//! Client business logic - Handles all client-related operations.
//!
//! Provides listing, creation, partial updates and deletion of clients, plus the
//! conversion of a client row into the attribute bag used for export. The only
//! validation performed is that `full_name` is present on creation.

use crate::{
    core::{
        columns::{
            assign_flag, assign_list, assign_required_text, assign_text, flag, opt_text,
            require_text, timestamp,
        },
        record::Record,
    },
    entities::{Client, StringList, client},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

const ENTITY: &str = "client";

/// Retrieves all clients, newest first.
pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_desc(client::Column::CreatedAt)
        .order_by_desc(client::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a client by its unique ID.
pub async fn get_client_by_id(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Option<client::Model>> {
    Client::find_by_id(client_id).one(db).await.map_err(Into::into)
}

/// Creates a client from the given attributes.
///
/// # Errors
/// Returns an error if `full_name` is missing or blank, or if the insert fails.
pub async fn create_client(db: &DatabaseConnection, fields: &Record) -> Result<client::Model> {
    let full_name = require_text(fields, ENTITY, "full_name")?;
    let now = chrono::Utc::now().naive_utc();

    let mut client = client::ActiveModel {
        full_name: Set(full_name),
        status: Set("Active".to_string()),
        tags: Set(StringList::default()),
        is_favorite: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    apply_fields(&mut client, fields);

    client.insert(db).await.map_err(Into::into)
}

/// Applies the attributes present in `fields` to an existing client.
///
/// # Errors
/// Returns an error if the client does not exist or the update fails.
pub async fn update_client(
    db: &DatabaseConnection,
    client_id: i64,
    fields: &Record,
) -> Result<client::Model> {
    let mut client: client::ActiveModel = get_client_by_id(db, client_id)
        .await?
        .ok_or(Error::RecordNotFound {
            entity: ENTITY,
            id: client_id,
        })?
        .into();

    apply_fields(&mut client, fields);
    client.updated_at = Set(chrono::Utc::now().naive_utc());

    client.update(db).await.map_err(Into::into)
}

/// Permanently deletes a client. Projects referencing it are left as they are.
///
/// # Errors
/// Returns an error if the client does not exist or the delete fails.
pub async fn delete_client(db: &DatabaseConnection, client_id: i64) -> Result<()> {
    let result = Client::delete_by_id(client_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            entity: ENTITY,
            id: client_id,
        });
    }
    Ok(())
}

fn apply_fields(client: &mut client::ActiveModel, fields: &Record) {
    assign_required_text(fields, "full_name", &mut client.full_name);
    assign_text(fields, "username", &mut client.username);
    assign_text(fields, "email", &mut client.email);
    assign_text(fields, "phone", &mut client.phone);
    assign_text(fields, "whatsapp_number", &mut client.whatsapp_number);
    assign_text(fields, "job_title", &mut client.job_title);
    assign_text(fields, "company_name", &mut client.company_name);
    assign_text(fields, "industry", &mut client.industry);
    assign_text(fields, "country", &mut client.country);
    assign_required_text(fields, "status", &mut client.status);
    assign_text(fields, "linkedin_url", &mut client.linkedin_url);
    assign_text(fields, "website_url", &mut client.website_url);
    assign_text(fields, "fiverr_profile", &mut client.fiverr_profile);
    assign_text(fields, "upwork_profile", &mut client.upwork_profile);
    assign_text(fields, "notes", &mut client.notes);
    assign_list(fields, "tags", &mut client.tags);
    assign_flag(fields, "is_favorite", &mut client.is_favorite);
}

/// Converts a client row into an export record, one attribute per column.
#[must_use]
pub fn to_record(client: &client::Model) -> Record {
    Record::new()
        .with("id", client.id.to_string())
        .with("full_name", client.full_name.as_str())
        .with("username", opt_text(client.username.as_ref()))
        .with("email", opt_text(client.email.as_ref()))
        .with("phone", opt_text(client.phone.as_ref()))
        .with("whatsapp_number", opt_text(client.whatsapp_number.as_ref()))
        .with("job_title", opt_text(client.job_title.as_ref()))
        .with("company_name", opt_text(client.company_name.as_ref()))
        .with("industry", opt_text(client.industry.as_ref()))
        .with("country", opt_text(client.country.as_ref()))
        .with("status", client.status.as_str())
        .with("linkedin_url", opt_text(client.linkedin_url.as_ref()))
        .with("website_url", opt_text(client.website_url.as_ref()))
        .with("fiverr_profile", opt_text(client.fiverr_profile.as_ref()))
        .with("upwork_profile", opt_text(client.upwork_profile.as_ref()))
        .with("notes", opt_text(client.notes.as_ref()))
        .with("tags", client.tags.0.clone())
        .with("is_favorite", flag(client.is_favorite))
        .with("created_at", timestamp(client.created_at))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_client_requires_full_name() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_client(&db, &Record::new().with("full_name", "   ")).await;
        assert!(matches!(
            result,
            Err(Error::MissingField {
                field: "full_name",
                ..
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_client_applies_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let client = create_client(
            &db,
            &Record::new()
                .with("full_name", " Jane Smith ")
                .with("company_name", "Tech Solutions Inc")
                .with("tags", "VIP, Marketing"),
        )
        .await?;

        assert_eq!(client.full_name, "Jane Smith");
        assert_eq!(client.status, "Active");
        assert_eq!(client.company_name.as_deref(), Some("Tech Solutions Inc"));
        assert_eq!(client.tags.0, vec!["VIP", "Marketing"]);
        assert!(!client.is_favorite);
        assert_eq!(client.email, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_client_is_partial() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Jane").await?;

        let updated = update_client(
            &db,
            client.id,
            &Record::new().with("is_favorite", "true").with("email", ""),
        )
        .await?;

        assert!(updated.is_favorite);
        assert_eq!(updated.email, None);
        assert_eq!(updated.full_name, "Jane");
        assert_eq!(updated.status, client.status);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_client() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_client(&db, 42, &Record::new()).await;
        assert!(matches!(result, Err(Error::RecordNotFound { id: 42, .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_client() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Jane").await?;

        delete_client(&db, client.id).await?;
        assert!(get_client_by_id(&db, client.id).await?.is_none());

        let again = delete_client(&db, client.id).await;
        assert!(matches!(again, Err(Error::RecordNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_to_record_exports_every_column() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Jane").await?;

        let record = to_record(&client);
        assert_eq!(record.text("full_name").as_deref(), Some("Jane"));
        assert_eq!(record.text("email"), None);
        assert!(record.contains_key("email"));
        assert_eq!(record.list("tags"), Some(Vec::new()));
        assert_eq!(record.text("is_favorite").as_deref(), Some("false"));

        Ok(())
    }
}
