//! Doer business logic - Handles all doer-related operations.
//!
//! Doers carry list-valued attributes (skills, technologies, portfolio links,
//! tags) and optional rates. Creation requires `full_name` and
//! `primary_expertise`; nothing else is validated.

use crate::{
    core::{
        columns::{
            assign_amount, assign_flag, assign_list, assign_required_text, assign_text, flag,
            opt_amount, opt_text, require_text, timestamp,
        },
        record::Record,
    },
    entities::{Doer, StringList, doer},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

const ENTITY: &str = "doer";

/// Retrieves all doers, newest first.
pub async fn list_doers(db: &DatabaseConnection) -> Result<Vec<doer::Model>> {
    Doer::find()
        .order_by_desc(doer::Column::CreatedAt)
        .order_by_desc(doer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a doer by its unique ID.
pub async fn get_doer_by_id(db: &DatabaseConnection, doer_id: i64) -> Result<Option<doer::Model>> {
    Doer::find_by_id(doer_id).one(db).await.map_err(Into::into)
}

/// Creates a doer from the given attributes.
///
/// # Errors
/// Returns an error if `full_name` or `primary_expertise` is missing, or if the insert fails.
pub async fn create_doer(db: &DatabaseConnection, fields: &Record) -> Result<doer::Model> {
    let full_name = require_text(fields, ENTITY, "full_name")?;
    let primary_expertise = require_text(fields, ENTITY, "primary_expertise")?;
    let now = chrono::Utc::now().naive_utc();

    let mut doer = doer::ActiveModel {
        full_name: Set(full_name),
        primary_expertise: Set(primary_expertise),
        availability_status: Set("Available".to_string()),
        skills: Set(StringList::default()),
        technologies: Set(StringList::default()),
        portfolio_links: Set(StringList::default()),
        tags: Set(StringList::default()),
        is_favorite: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    apply_fields(&mut doer, fields);

    doer.insert(db).await.map_err(Into::into)
}

/// Applies the attributes present in `fields` to an existing doer.
///
/// # Errors
/// Returns an error if the doer does not exist or the update fails.
pub async fn update_doer(
    db: &DatabaseConnection,
    doer_id: i64,
    fields: &Record,
) -> Result<doer::Model> {
    let mut doer: doer::ActiveModel = get_doer_by_id(db, doer_id)
        .await?
        .ok_or(Error::RecordNotFound {
            entity: ENTITY,
            id: doer_id,
        })?
        .into();

    apply_fields(&mut doer, fields);
    doer.updated_at = Set(chrono::Utc::now().naive_utc());

    doer.update(db).await.map_err(Into::into)
}

/// Permanently deletes a doer. Projects referencing it are left as they are.
///
/// # Errors
/// Returns an error if the doer does not exist or the delete fails.
pub async fn delete_doer(db: &DatabaseConnection, doer_id: i64) -> Result<()> {
    let result = Doer::delete_by_id(doer_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            entity: ENTITY,
            id: doer_id,
        });
    }
    Ok(())
}

fn apply_fields(doer: &mut doer::ActiveModel, fields: &Record) {
    assign_required_text(fields, "full_name", &mut doer.full_name);
    assign_text(fields, "email", &mut doer.email);
    assign_text(fields, "phone", &mut doer.phone);
    assign_text(fields, "whatsapp_number", &mut doer.whatsapp_number);
    assign_text(fields, "telegram_username", &mut doer.telegram_username);
    assign_required_text(fields, "primary_expertise", &mut doer.primary_expertise);
    assign_required_text(fields, "availability_status", &mut doer.availability_status);
    assign_text(fields, "work_arrangement", &mut doer.work_arrangement);
    assign_amount(fields, "hourly_rate", &mut doer.hourly_rate);
    assign_amount(fields, "project_rate", &mut doer.project_rate);
    assign_amount(fields, "rating", &mut doer.rating);
    assign_text(fields, "country", &mut doer.country);
    assign_text(fields, "fiverr_profile", &mut doer.fiverr_profile);
    assign_text(fields, "upwork_profile", &mut doer.upwork_profile);
    assign_text(fields, "notes", &mut doer.notes);
    assign_list(fields, "skills", &mut doer.skills);
    assign_list(fields, "technologies", &mut doer.technologies);
    assign_list(fields, "portfolio_links", &mut doer.portfolio_links);
    assign_list(fields, "tags", &mut doer.tags);
    assign_flag(fields, "is_favorite", &mut doer.is_favorite);
}

/// Converts a doer row into an export record, one attribute per column.
#[must_use]
pub fn to_record(doer: &doer::Model) -> Record {
    Record::new()
        .with("id", doer.id.to_string())
        .with("full_name", doer.full_name.as_str())
        .with("email", opt_text(doer.email.as_ref()))
        .with("phone", opt_text(doer.phone.as_ref()))
        .with("whatsapp_number", opt_text(doer.whatsapp_number.as_ref()))
        .with("telegram_username", opt_text(doer.telegram_username.as_ref()))
        .with("primary_expertise", doer.primary_expertise.as_str())
        .with("availability_status", doer.availability_status.as_str())
        .with("work_arrangement", opt_text(doer.work_arrangement.as_ref()))
        .with("hourly_rate", opt_amount(doer.hourly_rate))
        .with("project_rate", opt_amount(doer.project_rate))
        .with("rating", opt_amount(doer.rating))
        .with("country", opt_text(doer.country.as_ref()))
        .with("fiverr_profile", opt_text(doer.fiverr_profile.as_ref()))
        .with("upwork_profile", opt_text(doer.upwork_profile.as_ref()))
        .with("notes", opt_text(doer.notes.as_ref()))
        .with("skills", doer.skills.0.clone())
        .with("technologies", doer.technologies.0.clone())
        .with("portfolio_links", doer.portfolio_links.0.clone())
        .with("tags", doer.tags.0.clone())
        .with("is_favorite", flag(doer.is_favorite))
        .with("created_at", timestamp(doer.created_at))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::codec;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_doer_requires_expertise() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_doer(&db, &Record::new().with("full_name", "John")).await;
        assert!(matches!(
            result,
            Err(Error::MissingField {
                field: "primary_expertise",
                ..
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_doer_from_imported_row() -> Result<()> {
        let db = setup_test_db().await?;
        let rows = codec::from_delimited_text(
            "full_name,primary_expertise,hourly_rate,skills,portfolio_links\n\
             \"John Doe\",\"Full Stack Development\",\"85\",\"React, Node.js\",\"https://github.com/johndoe, https://johndoe.dev\"",
        );

        let doer = create_doer(&db, &rows[0]).await?;

        assert_eq!(doer.full_name, "John Doe");
        assert_eq!(doer.availability_status, "Available");
        assert_eq!(doer.hourly_rate, Some(85.0));
        assert_eq!(doer.skills.0, vec!["React", "Node.js"]);
        assert_eq!(
            doer.portfolio_links.0,
            vec!["https://github.com/johndoe", "https://johndoe.dev"]
        );
        assert!(doer.technologies.0.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_doer_clears_rate() -> Result<()> {
        let db = setup_test_db().await?;
        let doer = create_test_doer(&db, "John").await?;

        let updated =
            update_doer(&db, doer.id, &Record::new().with("hourly_rate", "85.5")).await?;
        assert_eq!(updated.hourly_rate, Some(85.5));

        let cleared = update_doer(&db, doer.id, &Record::new().with("hourly_rate", "")).await?;
        assert_eq!(cleared.hourly_rate, None);
        assert_eq!(cleared.primary_expertise, doer.primary_expertise);

        Ok(())
    }

    #[tokio::test]
    async fn test_doer_export_round_trips_through_codec() -> Result<()> {
        let db = setup_test_db().await?;
        let doer = create_doer(
            &db,
            &Record::new()
                .with("full_name", "Jane")
                .with("primary_expertise", "Design")
                .with("skills", vec!["Figma".to_string(), "Illustration".to_string()])
                .with("notes", "Fast, reliable"),
        )
        .await?;

        let text = codec::to_delimited_text(&[to_record(&doer)]);
        let parsed = codec::from_delimited_text(&text);

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].text("notes").as_deref(), Some("Fast, reliable"));
        assert_eq!(
            parsed[0].list("skills"),
            Some(vec!["Figma".to_string(), "Illustration".to_string()])
        );
        assert!(!parsed[0].contains_key("email"));
        assert!(!parsed[0].contains_key("hourly_rate"));

        Ok(())
    }
}
