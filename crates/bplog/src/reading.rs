//! Core reading types for bplog.
//!
//! A [`Reading`] is one recorded blood-pressure observation. Readings are
//! created from a [`NewReading`] when the store assigns an id, and are never
//! changed afterwards.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::classify::{classify, Category};
use crate::photo::Photo;

/// Identifier of a reading: milliseconds since the Unix epoch at creation.
pub type ReadingId = i64;

/// Wire format of a reading's local timestamp.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A reading that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReading {
    /// Systolic pressure in mmHg.
    pub systolic: u16,
    /// Diastolic pressure in mmHg.
    pub diastolic: u16,
    /// Pulse in beats per minute.
    pub pulse: Option<u16>,
    /// Local time of the measurement.
    pub datetime: NaiveDateTime,
    /// Free-text note.
    pub notes: Option<String>,
    /// Photo of the monitor display.
    pub photo: Option<Photo>,
}

/// A stored blood-pressure observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Unique identifier, the only lookup key.
    pub id: ReadingId,

    /// Systolic pressure in mmHg.
    pub systolic: u16,

    /// Diastolic pressure in mmHg.
    pub diastolic: u16,

    /// Pulse in beats per minute, if measured.
    #[serde(default)]
    pub pulse: Option<u16>,

    /// Local time of the measurement, minute precision.
    #[serde(with = "local_minutes")]
    pub datetime: NaiveDateTime,

    /// Free-text note.
    #[serde(default)]
    pub notes: Option<String>,

    /// Photo of the monitor display.
    #[serde(default)]
    pub photo: Option<Photo>,

    /// Category computed when the reading was created.
    pub category: Category,
}

impl Reading {
    /// Build a reading from a draft, classifying it and truncating the
    /// timestamp to the minute.
    #[must_use]
    pub fn new(id: ReadingId, draft: NewReading) -> Self {
        let category = classify(draft.systolic, draft.diastolic);
        Self {
            id,
            systolic: draft.systolic,
            diastolic: draft.diastolic,
            pulse: draft.pulse,
            datetime: truncate_to_minute(draft.datetime),
            notes: draft.notes,
            photo: draft.photo,
            category,
        }
    }

    /// The pulse value if it counts as a measurement. Zero is treated as absent.
    #[must_use]
    pub fn measured_pulse(&self) -> Option<u16> {
        self.pulse.filter(|&p| p > 0)
    }

    /// The note if it is present and non-empty.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.is_empty())
    }
}

/// Drop seconds and sub-second precision.
#[must_use]
pub fn truncate_to_minute(datetime: NaiveDateTime) -> NaiveDateTime {
    datetime
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(datetime)
}

/// Parse a local timestamp as typed into the entry form.
///
/// Accepts `YYYY-MM-DDTHH:MM`, optionally followed by `:SS`, and a space in
/// place of the `T`.
#[must_use]
pub fn parse_local_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    [
        DATETIME_FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ]
    .iter()
    .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
    .map(truncate_to_minute)
}

/// Serde adapter storing timestamps in the form's local `YYYY-MM-DDTHH:MM`
/// format.
mod local_minutes {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{parse_local_datetime, DATETIME_FORMAT};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_local_datetime(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid local datetime: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn draft(systolic: u16, diastolic: u16) -> NewReading {
        NewReading {
            systolic,
            diastolic,
            pulse: Some(70),
            datetime: at(1, 8, 30),
            notes: None,
            photo: None,
        }
    }

    #[test]
    fn test_new_classifies() {
        let reading = Reading::new(1, draft(145, 85));
        assert_eq!(reading.category, Category::High);
        assert_eq!(reading.id, 1);

        let reading = Reading::new(2, draft(115, 75));
        assert_eq!(reading.category, Category::Normal);
    }

    #[test]
    fn test_new_truncates_seconds() {
        let mut d = draft(120, 80);
        d.datetime = at(1, 8, 30).with_second(42).unwrap();
        let reading = Reading::new(1, d);
        assert_eq!(reading.datetime, at(1, 8, 30));
    }

    #[test]
    fn test_measured_pulse_treats_zero_as_absent() {
        let mut reading = Reading::new(1, draft(120, 80));
        assert_eq!(reading.measured_pulse(), Some(70));
        reading.pulse = Some(0);
        assert_eq!(reading.measured_pulse(), None);
        reading.pulse = None;
        assert_eq!(reading.measured_pulse(), None);
    }

    #[test]
    fn test_note_skips_empty() {
        let mut reading = Reading::new(1, draft(120, 80));
        assert!(reading.note().is_none());
        reading.notes = Some(String::new());
        assert!(reading.note().is_none());
        reading.notes = Some("after coffee".to_string());
        assert_eq!(reading.note(), Some("after coffee"));
    }

    #[test]
    fn test_parse_local_datetime_formats() {
        assert_eq!(parse_local_datetime("2024-03-01T08:30"), Some(at(1, 8, 30)));
        assert_eq!(parse_local_datetime("2024-03-01T08:30:59"), Some(at(1, 8, 30)));
        assert_eq!(parse_local_datetime(" 2024-03-01 08:30 "), Some(at(1, 8, 30)));
        assert_eq!(parse_local_datetime("yesterday"), None);
    }

    #[test]
    fn test_json_field_layout() {
        let reading = Reading::new(1_709_281_800_000, draft(128, 82));
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["id"], 1_709_281_800_000_i64);
        assert_eq!(json["datetime"], "2024-03-01T08:30");
        assert_eq!(json["category"], "elevated");
        assert!(json["photo"].is_null());
    }

    #[test]
    fn test_deserialize_with_null_optionals() {
        let json = r#"{
            "id": 5,
            "systolic": 118,
            "diastolic": 76,
            "pulse": null,
            "datetime": "2024-03-02T21:05",
            "notes": "",
            "photo": null,
            "category": "normal"
        }"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.pulse, None);
        assert_eq!(reading.datetime, at(2, 21, 5));
        assert!(reading.note().is_none());
    }

    #[test]
    fn test_stored_category_is_not_recomputed() {
        let json = r#"{"id":1,"systolic":150,"diastolic":95,"datetime":"2024-03-01T08:30","category":"normal"}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.category, Category::Normal);
    }
}
