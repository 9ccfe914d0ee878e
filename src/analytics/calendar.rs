use crate::models::EnrichedEvent;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::fmt;

/// A UTC calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(instant: &DateTime<Utc>) -> Self {
        YearMonth {
            year: instant.year(),
            month: instant.month(),
        }
    }

    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_index(index: i64) -> Option<Self> {
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
        Some(YearMonth { year, month })
    }

    /// The month `count` months before this one
    pub fn minus_months(self, count: u32) -> Option<Self> {
        Self::from_index(self.index() - i64::from(count))
    }

    /// First instant (00:00:00 UTC on the 1st) of the month, if representable
    pub fn first_instant(self) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The latest play in the whole event set; queries measure "now" from here
/// so results depend only on the data, not the wall clock
pub fn reference_instant(events: &[EnrichedEvent]) -> Option<DateTime<Utc>> {
    events.iter().map(|event| event.timestamp).max()
}

/// Start of the window covering `months` calendar months ending with the
/// month of `reference`. `None` when `months` is zero.
pub fn window_start(reference: &DateTime<Utc>, months: u32) -> Option<YearMonth> {
    let last = months.checked_sub(1)?;
    YearMonth::of(reference).minus_months(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_minus_months_crosses_year_boundary() {
        let march = YearMonth { year: 2025, month: 3 };
        assert_eq!(march.minus_months(0), Some(march));
        assert_eq!(
            march.minus_months(2),
            Some(YearMonth { year: 2025, month: 1 })
        );
        assert_eq!(
            march.minus_months(3),
            Some(YearMonth { year: 2024, month: 12 })
        );
        assert_eq!(
            march.minus_months(27),
            Some(YearMonth { year: 2022, month: 12 })
        );
    }

    #[test]
    fn test_first_instant_is_utc_midnight() {
        let feb = YearMonth { year: 2024, month: 2 };
        assert_eq!(
            feb.first_instant(),
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(feb.to_string(), "2024-02");
    }

    #[test]
    fn test_window_start() {
        let reference = Utc.with_ymd_and_hms(2025, 3, 20, 8, 0, 0).unwrap();
        assert_eq!(window_start(&reference, 0), None);
        assert_eq!(
            window_start(&reference, 1),
            Some(YearMonth { year: 2025, month: 3 })
        );
        assert_eq!(
            window_start(&reference, 4),
            Some(YearMonth { year: 2024, month: 12 })
        );
    }
}
