//! The entry form.
//!
//! Fields are kept as the raw text the user typed. Nothing is parsed until
//! [`EntryForm::validate`] runs, so a half-filled form is always representable.

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::error::{Error, Result};
use crate::photo::Photo;
use crate::reading::{parse_local_datetime, truncate_to_minute, NewReading, Reading, DATETIME_FORMAT};
use crate::storage::Backend;
use crate::store::ReadingStore;

/// Input for one new reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    /// Systolic pressure, required.
    pub systolic: String,
    /// Diastolic pressure, required.
    pub diastolic: String,
    /// Pulse, optional.
    pub pulse: String,
    /// Local date and time as `YYYY-MM-DDTHH:MM`.
    pub datetime: String,
    /// Free-text note, optional.
    pub notes: String,
    photo: Option<Photo>,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self::at(Local::now().naive_local())
    }
}

impl EntryForm {
    /// A fresh form with the date/time set to now.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh form with the date/time set to `now`.
    #[must_use]
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            systolic: String::new(),
            diastolic: String::new(),
            pulse: String::new(),
            datetime: truncate_to_minute(now).format(DATETIME_FORMAT).to_string(),
            notes: String::new(),
            photo: None,
        }
    }

    /// The attached photo.
    #[must_use]
    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    /// Attach `photo`, replacing any earlier one.
    pub fn set_photo(&mut self, photo: Photo) -> &Photo {
        self.photo.insert(photo)
    }

    /// Drop the attached photo.
    pub fn clear_photo(&mut self) {
        self.photo = None;
    }

    /// Check the fields and build a draft reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first field that is missing
    /// or not a number, or a date/time that cannot be parsed.
    pub fn validate(&self) -> Result<NewReading> {
        let systolic = required_number("systolic", &self.systolic)?;
        let diastolic = required_number("diastolic", &self.diastolic)?;
        let pulse = optional_number("pulse", &self.pulse)?;

        let datetime = self.datetime.trim();
        if datetime.is_empty() {
            return Err(Error::invalid_input("datetime", "is required"));
        }
        let datetime = parse_local_datetime(datetime).ok_or_else(|| {
            Error::invalid_input(
                "datetime",
                format!("'{datetime}' is not a date and time like 2024-03-14T08:30"),
            )
        })?;

        let notes = self.notes.trim();
        let notes = (!notes.is_empty()).then(|| notes.to_string());

        Ok(NewReading {
            systolic,
            diastolic,
            pulse,
            datetime,
            notes,
            photo: self.photo.clone(),
        })
    }

    /// Validate, append the reading to `store` and reset the form.
    ///
    /// The form is left untouched when validation or the save fails.
    ///
    /// # Errors
    ///
    /// Returns the validation error or the store's persistence error.
    pub fn submit<'s, B: Backend>(&mut self, store: &'s mut ReadingStore<B>) -> Result<&'s Reading> {
        let draft = self.validate()?;
        let reading = store.append(draft)?;
        debug!("Form submitted as reading {}", reading.id);
        self.reset();
        Ok(reading)
    }

    /// Clear every field, set the date/time to now and drop the photo.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn required_number(field: &'static str, value: &str) -> Result<u16> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid_input(field, "is required"));
    }
    parse_number(field, value)
}

fn optional_number(field: &'static str, value: &str) -> Result<Option<u16>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse_number(field, value).map(Some)
}

fn parse_number(field: &'static str, value: &str) -> Result<u16> {
    value
        .parse()
        .map_err(|_| Error::invalid_input(field, format!("'{value}' is not a whole number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(8, 30, 45)
            .unwrap()
    }

    fn filled() -> EntryForm {
        let mut form = EntryForm::at(now());
        form.systolic = "128".to_string();
        form.diastolic = "82".to_string();
        form
    }

    #[test]
    fn test_fresh_form_defaults_to_now() {
        let form = EntryForm::at(now());
        assert_eq!(form.datetime, "2024-03-14T08:30");
        assert!(form.systolic.is_empty());
        assert!(form.photo().is_none());
    }

    #[test]
    fn test_validate_minimal() {
        let draft = filled().validate().unwrap();
        assert_eq!((draft.systolic, draft.diastolic), (128, 82));
        assert_eq!(draft.pulse, None);
        assert_eq!(draft.notes, None);
        assert_eq!(draft.datetime, truncate_to_minute(now()));
    }

    #[test]
    fn test_validate_optional_fields() {
        let mut form = filled();
        form.pulse = " 66 ".to_string();
        form.notes = "  after coffee ".to_string();
        form.set_photo(Photo::encode("image/jpeg", b"img"));

        let draft = form.validate().unwrap();
        assert_eq!(draft.pulse, Some(66));
        assert_eq!(draft.notes.as_deref(), Some("after coffee"));
        assert!(draft.photo.is_some());
    }

    #[test]
    fn test_missing_required_field() {
        let mut form = filled();
        form.diastolic.clear();

        let err = form.validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "invalid diastolic: is required");
    }

    #[test]
    fn test_non_numeric_fields() {
        let mut form = filled();
        form.systolic = "high".to_string();
        assert!(matches!(
            form.validate(),
            Err(Error::InvalidInput { field: "systolic", .. })
        ));

        let mut form = filled();
        form.pulse = "-3".to_string();
        assert!(matches!(
            form.validate(),
            Err(Error::InvalidInput { field: "pulse", .. })
        ));
    }

    #[test]
    fn test_bad_datetime() {
        let mut form = filled();
        form.datetime = "yesterday".to_string();
        assert!(matches!(
            form.validate(),
            Err(Error::InvalidInput { field: "datetime", .. })
        ));

        form.datetime.clear();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_whitespace_note_is_absent() {
        let mut form = filled();
        form.notes = "   ".to_string();
        assert_eq!(form.validate().unwrap().notes, None);
    }

    #[test]
    fn test_photo_replace_and_clear() {
        let mut form = filled();
        form.set_photo(Photo::encode("image/jpeg", b"one"));
        form.set_photo(Photo::encode("image/jpeg", b"two"));
        assert_eq!(form.photo().and_then(Photo::decode), Some(b"two".to_vec()));

        form.clear_photo();
        assert!(form.photo().is_none());
    }

    #[test]
    fn test_submit_appends_and_resets() {
        let mut store = ReadingStore::load(MemoryBackend::new(), "bp").unwrap();
        let mut form = filled();
        form.set_photo(Photo::encode("image/jpeg", b"img"));

        let reading = form.submit(&mut store).unwrap();
        assert_eq!(reading.systolic, 128);
        assert!(reading.photo.is_some());

        assert_eq!(store.len(), 1);
        assert!(form.systolic.is_empty());
        assert!(form.photo().is_none());
        assert!(!form.datetime.is_empty());
    }

    #[test]
    fn test_failed_submit_keeps_form() {
        let mut store = ReadingStore::load(MemoryBackend::new(), "bp").unwrap();
        let mut form = filled();
        form.systolic.clear();

        assert!(form.submit(&mut store).is_err());
        assert!(store.is_empty());
        assert_eq!(form.diastolic, "82");
    }
}
