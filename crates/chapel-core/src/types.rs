use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// How often an event repeats.
///
/// The five tags are the complete vocabulary accepted from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    None,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Weekly,
        Self::Biweekly,
        Self::Monthly,
        Self::Yearly,
    ];

    /// Storage tag for this frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Human-readable label shown on the schedule page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "One-time",
            Self::Weekly => "Every week",
            Self::Biweekly => "Every two weeks",
            Self::Monthly => "Every month",
            Self::Yearly => "Every year",
        }
    }

    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    /// ## Errors
    /// Returns `CoreError::InvalidRule` for any tag outside the vocabulary.
    /// Tags are matched exactly; no trimming or case folding is applied.
    fn from_str(tag: &str) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == tag)
            .ok_or_else(|| CoreError::InvalidRule {
                tag: tag.to_string(),
            })
    }
}

/// ## Summary
/// Anchor date, frequency and optional inclusive end date of an event series.
///
/// `base_date` is a wall-clock value in the site's configured time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub base_date: NaiveDateTime,
    pub frequency: Frequency,
    pub repeat_until: Option<NaiveDate>,
}

impl RecurrenceRule {
    #[must_use]
    pub const fn new(
        base_date: NaiveDateTime,
        frequency: Frequency,
        repeat_until: Option<NaiveDate>,
    ) -> Self {
        Self {
            base_date,
            frequency,
            repeat_until,
        }
    }

    /// ## Summary
    /// Builds a rule from a raw stored frequency tag.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidRule` if `tag` is not a known frequency.
    pub fn from_tag(
        base_date: NaiveDateTime,
        tag: &str,
        repeat_until: Option<NaiveDate>,
    ) -> CoreResult<Self> {
        Ok(Self::new(base_date, tag.parse()?, repeat_until))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for frequency in Frequency::ALL {
            assert_eq!(frequency.as_str().parse::<Frequency>().ok(), Some(frequency));
        }
    }

    #[test]
    fn test_unknown_tag_is_invalid_rule() {
        let err = "daily".parse::<Frequency>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidRule { ref tag } if tag == "daily"));
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!("Weekly".parse::<Frequency>().is_err());
        assert!(" weekly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_serde_uses_storage_tags() {
        let json = serde_json::to_string(&Frequency::Biweekly).unwrap();
        assert_eq!(json, "\"biweekly\"");
        let parsed: Frequency = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(parsed, Frequency::Yearly);
    }

    #[test]
    fn test_only_none_is_not_recurring() {
        assert!(!Frequency::None.is_recurring());
        assert!(Frequency::Monthly.is_recurring());
    }

    #[test]
    fn test_from_tag_rejects_unknown_frequency() {
        let base = NaiveDate::from_ymd_opt(2025, 6, 6)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        assert!(RecurrenceRule::from_tag(base, "fortnightly", None).is_err());
        let rule = RecurrenceRule::from_tag(base, "weekly", None).unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
    }
}
