//! Attribute-bag records exchanged between the tabular codec and the record store.
//!
//! A [`Record`] keeps its attributes in insertion order so exported columns follow
//! the order in which a record's fields were first written. Values are limited to
//! the three shapes the CSV format can express: text, decimal numbers, and flat
//! lists of strings.

use crate::core::finance::parse_decimal_prefix;
use crate::errors::Error;
use rust_decimal::Decimal;
use std::{fmt, str::FromStr};

/// The three record types the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Customers that commission projects
    Client,
    /// Freelancers doing the work
    Doer,
    /// Units of work linking a client and a doer
    Project,
}

impl EntityKind {
    /// Singular, human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Doer => "doer",
            Self::Project => "project",
        }
    }

    /// Plural name used in table names and export filenames.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Client => "clients",
            Self::Doer => "doers",
            Self::Project => "projects",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" | "clients" => Ok(Self::Client),
            "doer" | "doers" => Ok(Self::Doer),
            "project" | "projects" => Ok(Self::Project),
            other => Err(Error::UnknownEntity {
                name: other.to_string(),
            }),
        }
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// Decimal number
    Number(Decimal),
    /// Flat list of strings (skills, tags, ...)
    List(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Ordered attribute bag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Sets `key`, keeping its position if it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Builder-style [`Record::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let index = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(index).1)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Attribute names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Trimmed text of `key`, or `None` if absent, blank, or not text.
    ///
    /// Numbers are rendered back to text so an id column parsed as a number
    /// still reads as an identifier.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            FieldValue::Text(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
            FieldValue::Number(n) => Some(n.normalize().to_string()),
            FieldValue::List(_) => None,
        }
    }

    /// Decimal value of `key`. Text is coerced leniently; unparseable text is `None`.
    #[must_use]
    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        match self.get(key)? {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => parse_decimal_prefix(s),
            FieldValue::List(_) => None,
        }
    }

    /// List value of `key`. Text is split on commas the same way the codec splits list columns.
    #[must_use]
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            FieldValue::List(items) => Some(items.clone()),
            FieldValue::Text(s) => Some(split_list(s)),
            FieldValue::Number(n) => Some(vec![n.normalize().to_string()]),
        }
    }

    /// Boolean flag; `true`, `yes` and `1` (any case) are true.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            FieldValue::Text(s) => Some(matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "1"
            )),
            FieldValue::Number(n) => Some(!n.is_zero()),
            FieldValue::List(_) => None,
        }
    }

    /// Integer identifier stored under `key`.
    #[must_use]
    pub fn id(&self, key: &str) -> Option<i64> {
        self.text(key)?.parse().ok()
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Splits a comma-joined list, trimming items and dropping empty ones.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut record = Record::new().with("a", "1").with("b", "2");
        record.insert("a", "3");
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.text("a").as_deref(), Some("3"));
    }

    #[test]
    fn test_text_skips_blank_values() {
        let record = Record::new().with("notes", "   ").with("name", " Jane ");
        assert_eq!(record.text("notes"), None);
        assert_eq!(record.text("name").as_deref(), Some("Jane"));
        assert_eq!(record.text("missing"), None);
    }

    #[test]
    fn test_decimal_coerces_text() {
        let record = Record::new()
            .with("rate", dec!(85.5))
            .with("tip", "12 dollars")
            .with("bad", "n/a");
        assert_eq!(record.decimal("rate"), Some(dec!(85.5)));
        assert_eq!(record.decimal("tip"), Some(dec!(12)));
        assert_eq!(record.decimal("bad"), None);
    }

    #[test]
    fn test_list_from_text() {
        let record = Record::new().with("skills", "React, , Node ");
        assert_eq!(
            record.list("skills"),
            Some(vec!["React".to_string(), "Node".to_string()])
        );
    }

    #[test]
    fn test_flag_and_id() {
        let record = Record::new()
            .with("is_favorite", "TRUE")
            .with("client_id", dec!(7))
            .with("doer_id", "abc");
        assert_eq!(record.flag("is_favorite"), Some(true));
        assert_eq!(record.id("client_id"), Some(7));
        assert_eq!(record.id("doer_id"), None);
    }

    #[test]
    fn test_entity_kind_parsing() {
        assert_eq!("Doers".parse::<EntityKind>().ok(), Some(EntityKind::Doer));
        assert_eq!("project".parse::<EntityKind>().ok(), Some(EntityKind::Project));
        assert!(matches!(
            "invoice".parse::<EntityKind>(),
            Err(Error::UnknownEntity { .. })
        ));
    }
}
