//! Copies attribute-bag values onto `SeaORM` active models and back.
//!
//! Only keys present in the incoming [`Record`] are touched, so the same helpers
//! serve both creation (on a fully defaulted model) and partial updates. A blank
//! text value clears an optional column.

use crate::core::record::{FieldValue, Record};
use crate::entities::StringList;
use crate::errors::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use sea_orm::{ActiveValue, Set};
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub(crate) fn assign_text(fields: &Record, key: &str, slot: &mut ActiveValue<Option<String>>) {
    if fields.contains_key(key) {
        *slot = Set(fields.text(key));
    }
}

/// Non-null text column; blank values leave the column unchanged.
pub(crate) fn assign_required_text(fields: &Record, key: &str, slot: &mut ActiveValue<String>) {
    if let Some(text) = fields.text(key) {
        *slot = Set(text);
    }
}

pub(crate) fn assign_amount(fields: &Record, key: &str, slot: &mut ActiveValue<Option<f64>>) {
    if fields.contains_key(key) {
        *slot = Set(fields.decimal(key).and_then(|amount| amount.to_f64()));
    }
}

pub(crate) fn assign_list(fields: &Record, key: &str, slot: &mut ActiveValue<StringList>) {
    if let Some(items) = fields.list(key) {
        *slot = Set(StringList(items));
    }
}

pub(crate) fn assign_flag(fields: &Record, key: &str, slot: &mut ActiveValue<bool>) {
    if let Some(flag) = fields.flag(key) {
        *slot = Set(flag);
    }
}

pub(crate) fn assign_id(fields: &Record, key: &str, slot: &mut ActiveValue<i64>) {
    if let Some(id) = fields.id(key) {
        *slot = Set(id);
    }
}

pub(crate) fn assign_date(fields: &Record, key: &str, slot: &mut ActiveValue<Option<NaiveDate>>) {
    if fields.contains_key(key) {
        *slot = Set(date(fields, key));
    }
}

/// Parses `YYYY-MM-DD`, also accepting the date part of a timestamp.
pub(crate) fn date(fields: &Record, key: &str) -> Option<NaiveDate> {
    let text = fields.text(key)?;
    let day = text.get(..10).unwrap_or(&text);
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

pub(crate) fn require_text(fields: &Record, entity: &'static str, field: &'static str) -> Result<String> {
    fields
        .text(field)
        .ok_or(Error::MissingField { entity, field })
}

pub(crate) fn require_id(fields: &Record, entity: &'static str, field: &'static str) -> Result<i64> {
    fields.id(field).ok_or(Error::MissingField { entity, field })
}

pub(crate) fn require_date(
    fields: &Record,
    entity: &'static str,
    field: &'static str,
) -> Result<NaiveDate> {
    date(fields, field).ok_or(Error::MissingField { entity, field })
}

/// Stored dollar amount as a decimal. Values `Decimal` cannot hold read as zero.
pub(crate) fn to_decimal(amount: f64) -> Decimal {
    Decimal::from_f64(amount).unwrap_or_else(|| {
        warn!(amount, "Stored amount is outside the decimal range, reading it as zero");
        Decimal::ZERO
    })
}

pub(crate) fn opt_text(value: Option<&String>) -> FieldValue {
    FieldValue::Text(value.cloned().unwrap_or_default())
}

pub(crate) fn opt_amount(value: Option<f64>) -> FieldValue {
    value.map_or_else(|| FieldValue::Text(String::new()), |v| FieldValue::Number(to_decimal(v)))
}

pub(crate) fn opt_date(value: Option<NaiveDate>) -> FieldValue {
    FieldValue::Text(value.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default())
}

pub(crate) fn timestamp(value: NaiveDateTime) -> FieldValue {
    FieldValue::Text(value.format(TIMESTAMP_FORMAT).to_string())
}

pub(crate) fn flag(value: bool) -> FieldValue {
    FieldValue::Text(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::NotSet;

    #[test]
    fn test_absent_keys_leave_slot_untouched() {
        let fields = Record::new();
        let mut slot: ActiveValue<Option<String>> = NotSet;
        assign_text(&fields, "email", &mut slot);
        assert!(matches!(slot, ActiveValue::NotSet));
    }

    #[test]
    fn test_blank_text_clears_optional_column() {
        let fields = Record::new().with("email", "");
        let mut slot = Set(Some("old@example.com".to_string()));
        assign_text(&fields, "email", &mut slot);
        assert_eq!(slot, Set(None));
    }

    #[test]
    fn test_date_accepts_timestamps() {
        let fields = Record::new()
            .with("deadline", "2025-03-01T10:00:00Z")
            .with("project_date", "01/03/2025");
        assert_eq!(date(&fields, "deadline"), NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(date(&fields, "project_date"), None);
    }

    #[test]
    fn test_to_decimal_out_of_range_reads_as_zero() {
        assert_eq!(to_decimal(12.5), Decimal::new(125, 1));
        assert_eq!(to_decimal(1e30), Decimal::ZERO);
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn test_require_text_reports_field() {
        let result = require_text(&Record::new(), "client", "full_name");
        assert!(matches!(
            result,
            Err(Error::MissingField {
                entity: "client",
                field: "full_name"
            })
        ));
    }
}
