//! Domain model: the recurrence vocabulary, field labels of the tracked
//! database, and the validated [`Row`] built from one raw record.

use chrono::{Days, Months, NaiveDate};
use chrono_tz::Tz;

use crate::errors::ParseError;
use crate::record::{RawProperty, RawRow, SelectOption};

/// The fixed time zone all calendar dates are derived in.
pub const ZONE: Tz = chrono_tz::Asia::Tokyo;

/// Field names of the tracked database. Fixed schema, not configurable.
pub const PROP_STATUS: &str = "状態";
pub const PROP_LAST_DONE: &str = "最後にやった日";
pub const PROP_NEXT_DUE: &str = "次にやる日";
pub const PROP_FREQUENCY: &str = "頻度";

/// Status option names driving the state machine.
pub const STATUS_DONE: &str = "やった";
pub const STATUS_PENDING: &str = "まだ";
pub const STATUS_TODO: &str = "やる";

/// Recurrence interval of a chore. Closed vocabulary known at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// 週2 — twice a week, tracked as every 3 days.
    TwiceWeekly,
    /// 週1 — weekly.
    Weekly,
    /// 隔週 — every other week.
    Biweekly,
    /// 月1 — monthly.
    Monthly,
}

impl Frequency {
    /// Resolve a frequency label, or `None` for labels outside the
    /// vocabulary.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "週2" => Some(Self::TwiceWeekly),
            "週1" => Some(Self::Weekly),
            "隔週" => Some(Self::Biweekly),
            "月1" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// The label this variant is parsed from.
    pub const fn label(self) -> &'static str {
        match self {
            Self::TwiceWeekly => "週2",
            Self::Weekly => "週1",
            Self::Biweekly => "隔週",
            Self::Monthly => "月1",
        }
    }

    /// Calendar-aware addition: day and week offsets are exact, month
    /// offsets clamp to the last day of shorter months.
    pub fn advance(self, from: NaiveDate) -> NaiveDate {
        match self {
            Self::TwiceWeekly => from + Days::new(3),
            Self::Weekly => from + Days::new(7),
            Self::Biweekly => from + Days::new(14),
            Self::Monthly => from + Months::new(1),
        }
    }
}

/// Value of a fixed-choice field: the property id plus the chosen option,
/// if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectValue {
    pub id: String,
    pub value: Option<SelectOption>,
}

impl SelectValue {
    /// Name of the chosen option, if one is set.
    pub fn name(&self) -> Option<&str> {
        self.value.as_ref().map(|option| option.name.as_str())
    }
}

/// One validated trackable row. Immutable once parsed, owned by the cycle
/// that fetched it.
#[derive(Debug, Clone)]
pub struct Row {
    pub id: String,
    /// The record's last-modification instant, localized then truncated.
    pub last_edited: NaiveDate,
    pub last_done: Option<NaiveDate>,
    pub next_due: Option<NaiveDate>,
    pub status: SelectValue,
    pub frequency: Frequency,
}

impl Row {
    /// Validate one raw record into a `Row`.
    pub fn parse(raw: &RawRow) -> Result<Self, ParseError> {
        if raw.object != "page" {
            return Err(ParseError::UnsupportedRowType {
                page_id: raw.id.clone(),
                object: raw.object.clone(),
            });
        }

        let last_edited = raw.last_edited_time.with_timezone(&ZONE).date_naive();

        let status = select_value(property(raw, PROP_STATUS)?)?;
        let last_done = date_value(property(raw, PROP_LAST_DONE)?)?;
        let next_due = date_value(property(raw, PROP_NEXT_DUE)?)?;
        let frequency = select_value(property(raw, PROP_FREQUENCY)?)?;

        let label = frequency
            .name()
            .ok_or_else(|| ParseError::NoFrequencySet {
                page_id: raw.id.clone(),
            })?;
        let frequency = Frequency::from_label(label).ok_or_else(|| ParseError::UnknownFrequency {
            page_id: raw.id.clone(),
            label: label.to_string(),
        })?;

        Ok(Self {
            id: raw.id.clone(),
            last_edited,
            last_done,
            next_due,
            status,
            frequency,
        })
    }
}

/// Look up a named property on a raw row.
fn property<'a>(row: &'a RawRow, name: &str) -> Result<&'a RawProperty, ParseError> {
    row.properties
        .get(name)
        .ok_or_else(|| ParseError::MissingProperty {
            page_id: row.id.clone(),
            name: name.to_string(),
        })
}

/// Read a fixed-choice property into a [`SelectValue`].
fn select_value(prop: &RawProperty) -> Result<SelectValue, ParseError> {
    if prop.kind != "select" {
        return Err(ParseError::TypeMismatch {
            property_id: prop.id.clone(),
            expected: "select",
            actual: prop.kind.clone(),
        });
    }
    Ok(SelectValue {
        id: prop.id.clone(),
        value: prop.select.clone(),
    })
}

/// Read a date property into an optional calendar date.
fn date_value(prop: &RawProperty) -> Result<Option<NaiveDate>, ParseError> {
    if prop.kind != "date" {
        return Err(ParseError::TypeMismatch {
            property_id: prop.id.clone(),
            expected: "date",
            actual: prop.kind.clone(),
        });
    }
    match &prop.date {
        None => Ok(None),
        Some(range) => {
            let date = plain_date(&range.start).ok_or_else(|| ParseError::InvalidDate {
                property_id: prop.id.clone(),
                value: range.start.clone(),
            })?;
            Ok(Some(date))
        }
    }
}

/// Parse the leading calendar-date portion of a date-or-datetime string.
fn plain_date(start: &str) -> Option<NaiveDate> {
    let date_part = start.get(..10).unwrap_or(start);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn chore_page(status: serde_json::Value, frequency: serde_json::Value) -> serde_json::Value {
        json!({
            "object": "page",
            "id": "page-1",
            "last_edited_time": "2024-03-10T03:00:00.000Z",
            "properties": {
                "状態": {"id": "st", "type": "select", "select": status},
                "最後にやった日": {"id": "ld", "type": "date", "date": null},
                "次にやる日": {"id": "nd", "type": "date", "date": null},
                "頻度": {"id": "fq", "type": "select", "select": frequency}
            }
        })
    }

    fn raw_row(value: serde_json::Value) -> RawRow {
        serde_json::from_value(value).expect("row fixture")
    }

    #[test]
    fn frequency_labels_round_trip() {
        for frequency in [
            Frequency::TwiceWeekly,
            Frequency::Weekly,
            Frequency::Biweekly,
            Frequency::Monthly,
        ] {
            assert_eq!(Frequency::from_label(frequency.label()), Some(frequency));
        }
        assert_eq!(Frequency::from_label("週3"), None);
        assert_eq!(Frequency::from_label(""), None);
    }

    #[test]
    fn day_and_week_offsets_are_exact() {
        let from = ymd(2024, 3, 10);
        assert_eq!(Frequency::TwiceWeekly.advance(from), ymd(2024, 3, 13));
        assert_eq!(Frequency::Weekly.advance(from), ymd(2024, 3, 17));
        assert_eq!(Frequency::Biweekly.advance(from), ymd(2024, 3, 24));
    }

    #[test]
    fn monthly_offset_clamps_to_shorter_months() {
        assert_eq!(Frequency::Monthly.advance(ymd(2024, 1, 31)), ymd(2024, 2, 29));
        assert_eq!(Frequency::Monthly.advance(ymd(2023, 1, 31)), ymd(2023, 2, 28));
        assert_eq!(Frequency::Monthly.advance(ymd(2024, 3, 15)), ymd(2024, 4, 15));
    }

    #[test]
    fn parse_builds_a_validated_row() {
        let raw = raw_row(chore_page(
            json!({"id": "opt-done", "name": "やった"}),
            json!({"id": "opt-weekly", "name": "週1"}),
        ));
        let row = Row::parse(&raw).expect("valid row");

        assert_eq!(row.id, "page-1");
        assert_eq!(row.status.name(), Some("やった"));
        assert_eq!(row.frequency, Frequency::Weekly);
        assert_eq!(row.last_done, None);
        assert_eq!(row.next_due, None);
        // 03:00 UTC is midday in Tokyo, same calendar date.
        assert_eq!(row.last_edited, ymd(2024, 3, 10));
    }

    #[test]
    fn last_edited_is_localized_before_truncation() {
        // 16:00 UTC is already 01:00 the next day in Tokyo.
        let mut value = chore_page(json!(null), json!({"id": "opt-weekly", "name": "週1"}));
        value["last_edited_time"] = json!("2024-03-10T16:00:00.000Z");
        let row = Row::parse(&raw_row(value)).expect("valid row");
        assert_eq!(row.last_edited, ymd(2024, 3, 11));
    }

    #[test]
    fn parse_rejects_non_page_objects() {
        let mut value = chore_page(json!(null), json!({"id": "opt-weekly", "name": "週1"}));
        value["object"] = json!("database");
        let err = Row::parse(&raw_row(value)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnsupportedRowType { ref page_id, ref object }
                if page_id == "page-1" && object == "database"
        ));
    }

    #[test]
    fn parse_requires_every_tracked_property() {
        let mut value = chore_page(json!(null), json!({"id": "opt-weekly", "name": "週1"}));
        value["properties"]
            .as_object_mut()
            .unwrap()
            .remove("次にやる日");
        let err = Row::parse(&raw_row(value)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingProperty { ref page_id, ref name }
                if page_id == "page-1" && name == "次にやる日"
        ));
    }

    #[test]
    fn parse_rejects_a_kind_mismatch() {
        let mut value = chore_page(json!(null), json!({"id": "opt-weekly", "name": "週1"}));
        value["properties"]["状態"] = json!({"id": "st", "type": "date", "date": null});
        let err = Row::parse(&raw_row(value)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TypeMismatch { ref property_id, expected, ref actual }
                if property_id == "st" && expected == "select" && actual == "date"
        ));
    }

    #[test]
    fn parse_requires_a_frequency_to_be_set() {
        let raw = raw_row(chore_page(json!(null), json!(null)));
        let err = Row::parse(&raw).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NoFrequencySet { ref page_id } if page_id == "page-1"
        ));
    }

    #[test]
    fn parse_rejects_an_unknown_frequency_label() {
        let raw = raw_row(chore_page(json!(null), json!({"id": "opt-x", "name": "週3"})));
        let err = Row::parse(&raw).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownFrequency { ref page_id, ref label }
                if page_id == "page-1" && label == "週3"
        ));
    }

    #[test]
    fn date_start_may_carry_a_time_component() {
        let mut value = chore_page(json!(null), json!({"id": "opt-weekly", "name": "週1"}));
        value["properties"]["次にやる日"]["date"] =
            json!({"start": "2024-03-17T10:00:00.000+09:00"});
        let row = Row::parse(&raw_row(value)).expect("valid row");
        assert_eq!(row.next_due, Some(ymd(2024, 3, 17)));
    }

    #[test]
    fn unreadable_date_start_is_an_error() {
        let mut value = chore_page(json!(null), json!({"id": "opt-weekly", "name": "週1"}));
        value["properties"]["最後にやった日"]["date"] = json!({"start": "soon"});
        let err = Row::parse(&raw_row(value)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidDate { ref property_id, ref value }
                if property_id == "ld" && value == "soon"
        ));
    }
}
