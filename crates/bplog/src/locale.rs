//! Display labels.

use serde::{Deserialize, Serialize};

use crate::classify::Category;

/// Language used for labels in history output and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Japanese.
    Ja,
}

impl Locale {
    /// Label for a category.
    #[must_use]
    pub fn category(self, category: Category) -> &'static str {
        match (self, category) {
            (Self::En, Category::Normal) => "Normal",
            (Self::En, Category::Elevated) => "Elevated",
            (Self::En, Category::High) => "High",
            (Self::Ja, Category::Normal) => "正常",
            (Self::Ja, Category::Elevated) => "高値血圧",
            (Self::Ja, Category::High) => "高血圧",
        }
    }

    /// Label for the systolic series.
    #[must_use]
    pub fn systolic(self) -> &'static str {
        match self {
            Self::En => "Systolic",
            Self::Ja => "最高血圧",
        }
    }

    /// Label for the diastolic series.
    #[must_use]
    pub fn diastolic(self) -> &'static str {
        match self {
            Self::En => "Diastolic",
            Self::Ja => "最低血圧",
        }
    }

    /// Label for the pulse series.
    #[must_use]
    pub fn pulse(self) -> &'static str {
        match self {
            Self::En => "Pulse",
            Self::Ja => "脈拍",
        }
    }

    /// Prefix for a reading's note.
    #[must_use]
    pub fn notes(self) -> &'static str {
        match self {
            Self::En => "Notes",
            Self::Ja => "メモ",
        }
    }

    /// Placeholder shown when the history is empty.
    #[must_use]
    pub fn no_records(self) -> &'static str {
        match self {
            Self::En => "No records yet",
            Self::Ja => "まだ記録がありません",
        }
    }

    /// Placeholder shown instead of an empty chart.
    #[must_use]
    pub fn no_chart_data(self) -> &'static str {
        match self {
            Self::En => "No data to chart for this period",
            Self::Ja => "表示するデータがありません",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Ja => write!(f, "ja"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale() {
        assert_eq!(Locale::default(), Locale::En);
    }

    #[test]
    fn test_series_labels() {
        assert_eq!(Locale::En.systolic(), "Systolic");
        assert_eq!(Locale::Ja.diastolic(), "最低血圧");
        assert_eq!(Locale::Ja.pulse(), "脈拍");
    }

    #[test]
    fn test_locale_serde() {
        let parsed: Locale = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(parsed, Locale::Ja);
        assert_eq!(Locale::Ja.to_string(), "ja");
    }
}
