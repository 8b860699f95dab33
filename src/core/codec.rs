//! Delimited-text import/export of records.
//!
//! The format is the one operators hand-edit in spreadsheets: `\n`-separated rows,
//! `,`-separated fields, every exported field wrapped in double quotes, and list
//! attributes joined with `", "` inside a single field.
//!
//! Parsing is deliberately permissive. A malformed row never fails the file; it
//! produces a best-effort record with whatever fields could be matched to a header.

use crate::core::record::{FieldValue, Record, split_list};
use crate::core::finance::parse_decimal_prefix;

/// Columns holding comma-joined lists.
pub const LIST_FIELDS: [&str; 4] = ["skills", "technologies", "tags", "portfolio_links"];

/// Columns parsed as decimal numbers on import.
pub const NUMERIC_FIELDS: [&str; 9] = [
    "hourly_rate",
    "project_rate",
    "rating",
    "client_deal_amount",
    "tip_amount",
    "doer_cost_amount",
    "deduction_amount",
    "profit_margin",
    "performance_rating",
];

/// Serializes records to delimited text.
///
/// The header row is the union of every record's keys in first-seen order, so a
/// column that only appears on a later record is still exported. Records missing
/// a column get an empty quoted field.
#[must_use]
pub fn to_delimited_text(records: &[Record]) -> String {
    let headers = collect_headers(records);
    if headers.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(headers.join(","));

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|header| quote(&record.get(header).map(render_value).unwrap_or_default()))
            .collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Parses delimited text into records. Never fails.
#[must_use]
pub fn from_delimited_text(text: &str) -> Vec<Record> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_row(&headers, line))
        .collect()
}

fn parse_row(headers: &[&str], line: &str) -> Record {
    let tokens = tokenize(line);
    let mut record = Record::new();

    for (i, header) in headers.iter().enumerate() {
        let value = tokens.get(i).map(|token| unquote(token));

        if LIST_FIELDS.contains(header) {
            record.insert(*header, value.map(split_list).unwrap_or_default());
        } else if NUMERIC_FIELDS.contains(header) {
            if let Some(number) = value.and_then(parse_decimal_prefix) {
                record.insert(*header, number);
            }
        } else if let Some(text) = value.filter(|v| !v.is_empty()) {
            record.insert(*header, text);
        }
    }

    record
}

fn collect_headers(records: &[Record]) -> Vec<&str> {
    let mut headers: Vec<&str> = Vec::new();
    for key in records.iter().flat_map(Record::keys) {
        if !headers.contains(&key) {
            headers.push(key);
        }
    }
    headers
}

fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Number(number) => number.normalize().to_string(),
        FieldValue::List(items) => items.join(", "),
    }
}

fn quote(value: &str) -> String {
    format!("\"{value}\"")
}

/// Strips one quote from each end, then trims.
fn unquote(token: &str) -> &str {
    let token = token.strip_prefix('"').unwrap_or(token);
    let token = token.strip_suffix('"').unwrap_or(token);
    token.trim()
}

/// Splits a row into raw field tokens.
///
/// A token is either a double-quoted span (which may contain commas) or a run of
/// non-comma characters, and must be followed by optional whitespace and then a
/// comma or the end of the line. A quoted span closes at the first quote that
/// satisfies that rule. Empty unquoted fields produce no token.
fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        match token_end(line, pos) {
            Some(end) => {
                tokens.push(&line[pos..end]);
                pos = end;
            }
            None => {
                pos += line[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    tokens
}

fn token_end(line: &str, start: usize) -> Option<usize> {
    let rest = &line[start..];

    if let Some(body) = rest.strip_prefix('"') {
        for (i, ch) in body.char_indices() {
            if matches!(ch, '\r' | '\u{2028}' | '\u{2029}') {
                break;
            }
            if ch == '"' && at_field_boundary(&body[i + 1..]) {
                return Some(start + 1 + i + 1);
            }
        }
    }

    let run = rest.find(',').unwrap_or(rest.len());
    (run > 0).then_some(start + run)
}

fn at_field_boundary(after: &str) -> bool {
    let after = after.trim_start();
    after.is_empty() || after.starts_with(',')
}
