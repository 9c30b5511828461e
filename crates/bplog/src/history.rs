//! History list rendering.
//!
//! Turns a filtered set of readings into display rows, newest first. An empty
//! input renders as [`HistoryView::Empty`] so callers can show a placeholder
//! instead of an empty list.

use serde::Serialize;

use crate::classify::Category;
use crate::locale::Locale;
use crate::photo::Photo;
use crate::reading::{Reading, ReadingId};

/// Format of the date/time column.
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

/// One line of the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow<'a> {
    /// Id of the underlying reading, used to request a delete.
    pub id: ReadingId,
    /// Formatted local date and time.
    pub date: String,
    /// Stored category.
    pub category: Category,
    /// Category label in the display locale.
    pub category_label: &'static str,
    /// Systolic pressure.
    pub systolic: u16,
    /// Diastolic pressure.
    pub diastolic: u16,
    /// Pulse, omitted when absent or zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse: Option<u16>,
    /// Attached photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<&'a Photo>,
    /// Note text, omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'a str>,
}

/// Rendered history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView<'a> {
    /// Nothing to show; display the "no records" placeholder.
    Empty,
    /// Rows ordered newest first.
    Rows(Vec<HistoryRow<'a>>),
}

impl<'a> HistoryView<'a> {
    /// Rows to display, empty for the placeholder state.
    #[must_use]
    pub fn rows(&self) -> &[HistoryRow<'a>] {
        match self {
            Self::Empty => &[],
            Self::Rows(rows) => rows,
        }
    }

    /// Whether this is the placeholder state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl<'a> HistoryRow<'a> {
    fn from_reading(reading: &'a Reading, locale: Locale) -> Self {
        Self {
            id: reading.id,
            date: reading.datetime.format(DISPLAY_FORMAT).to_string(),
            category: reading.category,
            category_label: reading.category.label(locale),
            systolic: reading.systolic,
            diastolic: reading.diastolic,
            pulse: reading.measured_pulse(),
            photo: reading.photo.as_ref(),
            note: reading.note(),
        }
    }
}

/// Render readings as history rows, most recent first.
///
/// Readings with the same timestamp keep their input order.
#[must_use]
pub fn render<'a>(readings: &[&'a Reading], locale: Locale) -> HistoryView<'a> {
    if readings.is_empty() {
        return HistoryView::Empty;
    }

    let mut sorted = readings.to_vec();
    sorted.sort_by(|a, b| b.datetime.cmp(&a.datetime));

    HistoryView::Rows(
        sorted
            .into_iter()
            .map(|reading| HistoryRow::from_reading(reading, locale))
            .collect(),
    )
}
