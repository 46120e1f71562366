//! Calendar-day and time-of-day math.
//!
//! Every date computation in the crate goes through [`DayClock`] so that
//! the time zone is an explicit, injected parameter. Streak and score
//! boundaries are therefore deterministic and testable across zones;
//! nothing else in the crate is allowed to reach for the local zone.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Day-key format used throughout the persisted document.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Coarse time-of-day buckets with fixed local-hour boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// 05:00 - 10:59
    Morning,
    /// 11:00 - 16:59
    Daytime,
    /// 17:00 - 21:59
    Evening,
    /// 22:00 - 04:59
    Night,
}

impl TimeOfDay {
    /// Bucket a local hour (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=10 => TimeOfDay::Morning,
            11..=16 => TimeOfDay::Daytime,
            17..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// All buckets in display order.
    pub fn all() -> [TimeOfDay; 4] {
        [
            TimeOfDay::Morning,
            TimeOfDay::Daytime,
            TimeOfDay::Evening,
            TimeOfDay::Night,
        ]
    }
}

/// Wall-clock adapter with an explicit UTC offset.
///
/// The offset is injected (from configuration) rather than read from the
/// system zone, so two engines over the same event stream agree on which
/// calendar day an event belongs to.
#[derive(Debug, Clone, Copy)]
pub struct DayClock {
    offset: FixedOffset,
}

impl DayClock {
    /// Create a clock at the given UTC offset, in minutes east.
    ///
    /// Offsets outside +-24h fall back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        Self { offset }
    }

    /// UTC clock.
    pub fn utc() -> Self {
        Self::from_offset_minutes(0)
    }

    /// Current instant.
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// The local calendar date of a timestamp.
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// Today's local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }

    /// The `YYYY-MM-DD` key for a timestamp.
    pub fn day_key(&self, ts: DateTime<Utc>) -> String {
        format_day_key(self.local_date(ts))
    }

    /// Today's `YYYY-MM-DD` key.
    pub fn today_key(&self) -> String {
        format_day_key(self.today())
    }

    /// The local hour (0-23) of a timestamp.
    pub fn local_hour(&self, ts: DateTime<Utc>) -> u32 {
        ts.with_timezone(&self.offset).hour()
    }

    /// Time-of-day bucket for a timestamp.
    pub fn time_of_day(&self, ts: DateTime<Utc>) -> TimeOfDay {
        TimeOfDay::from_hour(self.local_hour(ts))
    }
}

impl Default for DayClock {
    fn default() -> Self {
        Self::utc()
    }
}

/// Format a date as a `YYYY-MM-DD` day key.
pub fn format_day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` day key.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}

/// The day before the given date.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}

/// The Monday on or before the given date.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(10), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Daytime);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Daytime);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(22), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
    }

    #[test]
    fn test_day_key_respects_offset() {
        // 2026-03-01 23:30 UTC is already 2026-03-02 in a +1h zone
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap();
        assert_eq!(DayClock::utc().day_key(ts), "2026-03-01");
        assert_eq!(DayClock::from_offset_minutes(60).day_key(ts), "2026-03-02");
        assert_eq!(
            DayClock::from_offset_minutes(-60).day_key(ts),
            "2026-03-01"
        );
    }

    #[test]
    fn test_local_hour_shifts_bucket() {
        // 21:00 UTC is evening in UTC but night in a +2h zone
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 21, 0, 0).unwrap();
        assert_eq!(DayClock::utc().time_of_day(ts), TimeOfDay::Evening);
        assert_eq!(
            DayClock::from_offset_minutes(120).time_of_day(ts),
            TimeOfDay::Night
        );
    }

    #[test]
    fn test_day_key_round_trip() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        assert_eq!(parse_day_key(&format_day_key(date)), Some(date));
        assert_eq!(parse_day_key("not-a-date"), None);
    }

    #[test]
    fn test_monday_of_week() {
        // 2026-03-04 is a Wednesday
        let wed = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let mon = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(monday_of_week(wed), mon);
        assert_eq!(monday_of_week(mon), mon);
    }
}
