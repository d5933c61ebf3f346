use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily allowance of mistakes.
pub const MAX_LIVES: u8 = 3;

/// Remaining attempts plus the day they were last refilled.
///
/// `count` is always within `[0, MAX_LIVES]`; out-of-range persisted values
/// are clamped on load. `last_reset` is stored as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LivesRecord")]
pub struct Lives {
    count: u8,
    last_reset: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LivesRecord {
    count: i64,
    last_reset: NaiveDate,
}

impl From<LivesRecord> for Lives {
    fn from(record: LivesRecord) -> Self {
        let count = record.count.clamp(0, i64::from(MAX_LIVES));
        Self {
            count: u8::try_from(count).unwrap_or(MAX_LIVES),
            last_reset: record.last_reset,
        }
    }
}

impl Lives {
    /// A full allowance refilled on `today`.
    #[must_use]
    pub fn full(today: NaiveDate) -> Self {
        Self {
            count: MAX_LIVES,
            last_reset: today,
        }
    }

    /// Builds a record, clamping `count` to the allowance.
    #[must_use]
    pub fn new(count: u8, last_reset: NaiveDate) -> Self {
        Self {
            count: count.min(MAX_LIVES),
            last_reset,
        }
    }

    #[must_use]
    pub fn count(&self) -> u8 {
        self.count
    }

    #[must_use]
    pub fn last_reset(&self) -> NaiveDate {
        self.last_reset
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.count == 0
    }

    /// Whether the record was refilled on a different day than `today`.
    #[must_use]
    pub fn needs_reset(&self, today: NaiveDate) -> bool {
        self.last_reset != today
    }

    /// Returns the record that should be visible on `today`.
    ///
    /// Any day other than `last_reset` refills to [`MAX_LIVES`], including a
    /// stored date in the future.
    #[must_use]
    pub fn refreshed(self, today: NaiveDate) -> Self {
        if self.needs_reset(today) {
            Self::full(today)
        } else {
            self
        }
    }

    /// One fewer life, never below zero.
    #[must_use]
    pub fn decremented(self) -> Self {
        Self {
            count: self.count.saturating_sub(1),
            last_reset: self.last_reset,
        }
    }

    /// Filled and empty slots, for heart-style displays.
    #[must_use]
    pub fn slots(&self) -> (u8, u8) {
        (self.count, MAX_LIVES - self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{fixed_today, parse_date};

    #[test]
    fn refresh_on_another_day_refills() {
        let yesterday = parse_date("2023-11-13").unwrap();
        let lives = Lives::new(1, yesterday).refreshed(fixed_today());
        assert_eq!(lives, Lives::full(fixed_today()));
    }

    #[test]
    fn refresh_with_future_date_refills() {
        let tomorrow = parse_date("2023-11-15").unwrap();
        let lives = Lives::new(0, tomorrow);
        assert!(lives.needs_reset(fixed_today()));
        assert_eq!(lives.refreshed(fixed_today()), Lives::full(fixed_today()));
    }

    #[test]
    fn refresh_on_same_day_keeps_count() {
        let lives = Lives::new(1, fixed_today());
        assert_eq!(lives.refreshed(fixed_today()).count(), 1);
    }

    #[test]
    fn decrement_floors_at_zero() {
        let mut lives = Lives::new(1, fixed_today());
        lives = lives.decremented();
        assert!(lives.is_exhausted());
        lives = lives.decremented().decremented();
        assert_eq!(lives.count(), 0);
        assert_eq!(lives.last_reset(), fixed_today());
    }

    #[test]
    fn constructor_clamps_count() {
        assert_eq!(Lives::new(9, fixed_today()).count(), MAX_LIVES);
    }

    #[test]
    fn persisted_shape_uses_calendar_date_string() {
        let json = serde_json::to_string(&Lives::new(2, fixed_today())).unwrap();
        assert_eq!(json, r#"{"count":2,"lastReset":"2023-11-14"}"#);
    }

    #[test]
    fn persisted_count_is_clamped_on_load() {
        let high: Lives = serde_json::from_str(r#"{"count":7,"lastReset":"2023-11-14"}"#).unwrap();
        let low: Lives = serde_json::from_str(r#"{"count":-2,"lastReset":"2023-11-14"}"#).unwrap();
        assert_eq!(high.count(), 3);
        assert_eq!(low.count(), 0);
    }

    #[test]
    fn malformed_date_fails_to_load() {
        assert!(serde_json::from_str::<Lives>(r#"{"count":2,"lastReset":"soon"}"#).is_err());
    }

    #[test]
    fn slots_split_full_and_empty() {
        assert_eq!(Lives::new(1, fixed_today()).slots(), (1, 2));
    }
}
