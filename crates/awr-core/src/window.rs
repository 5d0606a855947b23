//! Reporting window: the previous calendar day in a fixed timezone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone used when no other is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Half-open interval `[start, end)` passed to the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl ReportWindow {
    /// The 24 hours ending at today's midnight in `tz`.
    pub fn previous_day(now: DateTime<Utc>, tz: Tz) -> Self {
        let today = now.with_timezone(&tz).date_naive();
        let end = local_midnight(today, tz);
        let start = end - Duration::hours(24);
        Self { start, end }
    }

    /// Renders the window as `<start>/<end>` in RFC 3339.
    pub fn to_timeperiod(&self) -> String {
        format!(
            "{}/{}",
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    pub fn timezone(&self) -> Tz {
        self.end.timezone()
    }
}

/// Midnight of `date` in `tz`.
/// Ambiguous midnights resolve to the earlier instant; a skipped midnight
/// resolves to 01:00.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            let one_am = midnight + Duration::hours(1);
            tz.from_local_datetime(&one_am)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_day_ends_at_local_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        let window = ReportWindow::previous_day(now, DEFAULT_TIMEZONE);

        assert_eq!(
            window.to_timeperiod(),
            "2024-01-01T00:00:00-05:00/2024-01-02T00:00:00-05:00"
        );
    }

    #[test]
    fn previous_day_uses_local_date_not_utc_date() {
        // 03:00 UTC on Jan 2 is still Jan 1 in New York.
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap();
        let window = ReportWindow::previous_day(now, DEFAULT_TIMEZONE);

        assert_eq!(
            window.to_timeperiod(),
            "2023-12-31T00:00:00-05:00/2024-01-01T00:00:00-05:00"
        );
    }

    #[test]
    fn window_is_always_24_hours() {
        // Spring-forward day: the local calendar day is only 23 hours long.
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();
        let window = ReportWindow::previous_day(now, DEFAULT_TIMEZONE);

        assert_eq!(window.end - window.start, Duration::hours(24));
        assert_eq!(
            window.to_timeperiod(),
            "2024-03-09T23:00:00-05:00/2024-03-11T00:00:00-04:00"
        );
    }

    #[test]
    fn utc_zone_renders_with_z_suffix() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap();
        let window = ReportWindow::previous_day(now, chrono_tz::UTC);

        assert_eq!(
            window.to_timeperiod(),
            "2024-06-14T00:00:00Z/2024-06-15T00:00:00Z"
        );
        assert_eq!(window.timezone(), chrono_tz::UTC);
    }

    #[test]
    fn skipped_midnight_falls_back_to_one_am() {
        // Santiago springs forward at local midnight.
        let tz = chrono_tz::America::Santiago;
        let date = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        let midnight = local_midnight(date, tz);

        assert_eq!(midnight.naive_local().time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }
}
