//! Filter state for the directory, clients and projects log screens.
//!
//! Filters are plain serializable values so a front end can persist them
//! between sessions. Text search is a case-insensitive substring match.

use crate::{
    core::report::NameLookup,
    entities::{StringList, client, doer, project},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Filter for the doer directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoerFilter {
    /// Matched against name, expertise, skills, technologies and tags
    pub search: String,
    pub favorites_only: bool,
    /// Exact tag; `None` shows every tag
    pub tag: Option<String>,
}

impl DoerFilter {
    #[must_use]
    pub fn matches(&self, doer: &doer::Model) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || contains(&doer.full_name, &needle)
            || contains(&doer.primary_expertise, &needle)
            || any_contains(&doer.skills, &needle)
            || any_contains(&doer.technologies, &needle)
            || any_contains(&doer.tags, &needle);

        matches_search
            && (!self.favorites_only || doer.is_favorite)
            && has_tag(&doer.tags, self.tag.as_deref())
    }
}

/// Filter for the clients screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientFilter {
    /// Matched against name, company, industry and tags
    pub search: String,
    pub favorites_only: bool,
    pub tag: Option<String>,
}

impl ClientFilter {
    #[must_use]
    pub fn matches(&self, client: &client::Model) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || contains(&client.full_name, &needle)
            || client.company_name.as_deref().is_some_and(|c| contains(c, &needle))
            || client.industry.as_deref().is_some_and(|i| contains(i, &needle))
            || any_contains(&client.tags, &needle);

        matches_search
            && (!self.favorites_only || client.is_favorite)
            && has_tag(&client.tags, self.tag.as_deref())
    }
}

/// Filter for the projects log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFilter {
    /// Matched against title, order number and the resolved client and doer names
    pub search: String,
    /// Inclusive lower bound on the project date
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the project date
    pub end_date: Option<NaiveDate>,
}

impl ProjectFilter {
    #[must_use]
    pub fn matches(&self, project: &project::Model, names: &NameLookup) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || contains(&project.title, &needle)
            || project.order_number.as_deref().is_some_and(|o| contains(o, &needle))
            || contains(names.client_name(project.client_id), &needle)
            || contains(names.doer_name(project.doer_id), &needle);

        let day = project.project_date;
        matches_search
            && self.start_date.is_none_or(|start| day >= start)
            && self.end_date.is_none_or(|end| day <= end)
    }

    /// The projects that pass the filter, in input order.
    #[must_use]
    pub fn apply<'a>(
        &self,
        projects: &'a [project::Model],
        names: &NameLookup,
    ) -> Vec<&'a project::Model> {
        projects.iter().filter(|p| self.matches(p, names)).collect()
    }
}

/// Every distinct non-empty tag across `lists`, sorted.
pub fn collect_tags<'a>(lists: impl IntoIterator<Item = &'a StringList>) -> Vec<String> {
    lists
        .into_iter()
        .flat_map(|list| list.0.iter())
        .filter(|tag| !tag.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn any_contains(list: &StringList, needle: &str) -> bool {
    list.0.iter().any(|item| contains(item, needle))
}

fn has_tag(tags: &StringList, tag: Option<&str>) -> bool {
    tag.is_none_or(|wanted| tags.0.iter().any(|t| t == wanted))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{client as clients, doer as doers, project as projects, record::Record};
    use crate::errors::Result;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_doer_filter() -> Result<()> {
        let db = setup_test_db().await?;
        let john = doers::create_doer(
            &db,
            &Record::new()
                .with("full_name", "John Doe")
                .with("primary_expertise", "Full Stack Development")
                .with("technologies", "React, Node.js")
                .with("tags", "frontend, react")
                .with("is_favorite", "true"),
        )
        .await?;
        let jane = create_test_doer(&db, "Jane").await?;

        let by_tech = DoerFilter {
            search: "NODE".to_string(),
            ..DoerFilter::default()
        };
        assert!(by_tech.matches(&john));
        assert!(!by_tech.matches(&jane));

        let favorites = DoerFilter {
            favorites_only: true,
            ..DoerFilter::default()
        };
        assert!(favorites.matches(&john));
        assert!(!favorites.matches(&jane));

        let tagged = DoerFilter {
            tag: Some("react".to_string()),
            ..DoerFilter::default()
        };
        assert!(tagged.matches(&john));
        assert!(!tagged.matches(&jane));

        assert!(DoerFilter::default().matches(&jane));
        assert_eq!(collect_tags([&john.tags, &jane.tags]), vec!["frontend", "react"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_client_filter() -> Result<()> {
        let db = setup_test_db().await?;
        let client = clients::create_client(
            &db,
            &Record::new()
                .with("full_name", "Jane Smith")
                .with("industry", "Enterprise SaaS")
                .with("tags", "VIP,Marketing"),
        )
        .await?;

        let by_industry = ClientFilter {
            search: "saas".to_string(),
            ..ClientFilter::default()
        };
        assert!(by_industry.matches(&client));

        let by_tag = ClientFilter {
            tag: Some("Marketing".to_string()),
            ..ClientFilter::default()
        };
        assert!(by_tag.matches(&client));

        let wrong_tag = ClientFilter {
            tag: Some("marketing".to_string()),
            ..ClientFilter::default()
        };
        assert!(!wrong_tag.matches(&client));

        Ok(())
    }

    #[tokio::test]
    async fn test_project_filter_by_name_and_dates() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;
        let doer = create_test_doer(&db, "John").await?;

        projects::create_project(
            &db,
            &project_fields("Website", client.id, doer.id).with("project_date", "2025-01-10"),
        )
        .await?;
        projects::create_project(
            &db,
            &project_fields("App", 999, doer.id)
                .with("project_date", "2025-02-20")
                .with("order_number", "FO-123"),
        )
        .await?;

        let all = projects::list_projects(&db).await?;
        let names = NameLookup::load(&db).await?;

        let by_client = ProjectFilter {
            search: "acme".to_string(),
            ..ProjectFilter::default()
        };
        let found = by_client.apply(&all, &names);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Website");

        let by_unknown = ProjectFilter {
            search: "unknown".to_string(),
            ..ProjectFilter::default()
        };
        assert_eq!(by_unknown.apply(&all, &names)[0].title, "App");

        let by_order = ProjectFilter {
            search: "fo-1".to_string(),
            ..ProjectFilter::default()
        };
        assert_eq!(by_order.apply(&all, &names).len(), 1);

        let february = ProjectFilter {
            start_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 2, 20),
            ..ProjectFilter::default()
        };
        let found = february.apply(&all, &names);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "App");

        Ok(())
    }

    #[test]
    fn test_filter_state_serializes() {
        let filter = ProjectFilter {
            search: "logo".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: None,
        };
        let text = serde_json::to_string(&filter).unwrap();
        assert!(text.contains("\"start_date\":\"2025-01-01\""));
        let parsed: ProjectFilter = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, filter);

        let partial: DoerFilter = serde_json::from_str(r#"{"favorites_only": true}"#).unwrap();
        assert!(partial.favorites_only);
        assert!(partial.search.is_empty());
    }
}
