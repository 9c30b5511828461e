//! Blood-pressure classification.
//!
//! Maps a systolic/diastolic pair to a [`Category`]. The category is computed
//! once when a reading is created and stored with it, so changing these
//! thresholds never rewrites existing history.

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Systolic value at or above which a reading is high.
pub const HIGH_SYSTOLIC: u16 = 140;
/// Diastolic value at or above which a reading is high.
pub const HIGH_DIASTOLIC: u16 = 90;
/// Systolic value at or above which a reading is elevated.
pub const ELEVATED_SYSTOLIC: u16 = 120;
/// Diastolic value at or above which a reading is elevated.
pub const ELEVATED_DIASTOLIC: u16 = 80;

/// Qualitative classification of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Below both elevated thresholds.
    Normal,
    /// At or above an elevated threshold, below both high thresholds.
    Elevated,
    /// At or above either high threshold.
    High,
}

impl Category {
    /// Human-readable label in the given locale.
    #[must_use]
    pub fn label(self, locale: Locale) -> &'static str {
        locale.category(self)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Elevated => write!(f, "elevated"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Classify a reading. The first matching rule wins: high, then elevated.
#[must_use]
pub fn classify(systolic: u16, diastolic: u16) -> Category {
    if systolic >= HIGH_SYSTOLIC || diastolic >= HIGH_DIASTOLIC {
        Category::High
    } else if systolic >= ELEVATED_SYSTOLIC || diastolic >= ELEVATED_DIASTOLIC {
        Category::Elevated
    } else {
        Category::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal() {
        assert_eq!(classify(110, 70), Category::Normal);
        assert_eq!(classify(119, 79), Category::Normal);
        assert_eq!(classify(0, 0), Category::Normal);
    }

    #[test]
    fn test_elevated_by_either_value() {
        assert_eq!(classify(120, 70), Category::Elevated);
        assert_eq!(classify(110, 80), Category::Elevated);
        assert_eq!(classify(139, 89), Category::Elevated);
    }

    #[test]
    fn test_high_wins_regardless_of_other_value() {
        assert_eq!(classify(140, 60), Category::High);
        assert_eq!(classify(100, 90), Category::High);
        assert_eq!(classify(145, 85), Category::High);
        assert_eq!(classify(125, 95), Category::High);
        assert_eq!(classify(300, 300), Category::High);
    }

    #[test]
    fn test_boundaries_sweep() {
        for systolic in 0..=300u16 {
            for diastolic in (0..=300u16).step_by(5) {
                let category = classify(systolic, diastolic);
                if systolic >= 140 || diastolic >= 90 {
                    assert_eq!(category, Category::High);
                } else if systolic >= 120 || diastolic >= 80 {
                    assert_eq!(category, Category::Elevated);
                } else {
                    assert_eq!(category, Category::Normal);
                }
            }
        }
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Normal.to_string(), "normal");
        assert_eq!(Category::Elevated.to_string(), "elevated");
        assert_eq!(Category::High.to_string(), "high");
    }

    #[test]
    fn test_category_serde_matches_display() {
        let json = serde_json::to_string(&Category::Elevated).unwrap();
        assert_eq!(json, "\"elevated\"");
        let parsed: Category = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Category::High);
    }

    #[test]
    fn test_category_label() {
        assert_eq!(Category::High.label(Locale::En), "High");
        assert_eq!(Category::High.label(Locale::Ja), "高血圧");
    }
}
