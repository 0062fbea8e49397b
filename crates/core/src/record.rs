//! Wire-level record model exchanged with the record store.
//!
//! Loosely typed on the way in: a row may carry property kinds the core
//! never reads (title, rich text, ...), so [`RawProperty`] keeps the
//! reported kind as a string and leaves unread payloads unset instead of
//! failing deserialization. Strictly shaped on the way out: write patches
//! serialize to exactly the shapes the store's update endpoint accepts.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One raw database row as returned by the store's query endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    /// Object kind; only `"page"` rows are processable.
    pub object: String,
    pub id: String,
    pub last_edited_time: DateTime<Utc>,
    pub properties: HashMap<String, RawProperty>,
}

/// One loosely-typed property on a raw row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    pub id: String,
    /// Kind reported by the store ("select", "date", ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub select: Option<SelectOption>,
    #[serde(default)]
    pub date: Option<DateRange>,
}

/// A chosen option of a fixed-choice field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
}

/// A date payload. `start` may be a plain date or a full RFC 3339 datetime;
/// only the leading calendar-date portion is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct DateRange {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Partial property update keyed by field name.
pub type PropertyPatch = HashMap<String, PropertyWrite>;

/// Writable property shapes accepted by the store's update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyWrite {
    Select { select: SelectName },
    Date { date: DateStart },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateStart {
    pub start: NaiveDate,
}

impl PropertyWrite {
    /// Patch selecting the option with the given name.
    pub fn select(name: &str) -> Self {
        Self::Select {
            select: SelectName {
                name: name.to_string(),
            },
        }
    }

    /// Patch setting a date field to a single calendar date.
    pub fn date(start: NaiveDate) -> Self {
        Self::Date {
            date: DateStart { start },
        }
    }
}
