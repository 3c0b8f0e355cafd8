//! Start/end date inference and CFP window computation.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::db::models::CfpStatus;

lazy_static::lazy_static! {
    static ref YEAR_TOKEN: Regex = Regex::new(r"20\d\d").unwrap();
    static ref QUARTER_TOKEN: Regex = Regex::new(r"(?i)\bQ([1-4])\b").unwrap();
}

/// How long before the event the CFP closes.
const CFP_CLOSE_LEAD_DAYS: i64 = 14;

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Guess a start date from a display name such as `"SRE Day Q3 2026"`.
///
/// The year defaults to `today`'s year and the quarter to Q1. The result is
/// always the first day of the quarter at UTC midnight.
pub fn parse_date_from_name(name: &str, today: NaiveDate) -> NaiveDateTime {
    let year = YEAR_TOKEN
        .find(name)
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .unwrap_or_else(|| today.year());

    let month = QUARTER_TOKEN
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|q| (q - 1) * 3 + 1)
        .unwrap_or(1);

    NaiveDate::from_ymd_opt(year, month, 1)
        .map(midnight)
        .unwrap_or_else(|| midnight(today))
}

/// Parse an explicit start timestamp from detail metadata.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` timestamp (taken as UTC) or a bare date.
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    parse_iso_date(raw)
}

/// Parse a `YYYY-MM-DD` date to UTC midnight.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .map(midnight)
}

/// Start and end date of an event.
///
/// An explicit start wins over the name heuristic. The end is `days - 1` days
/// after the start; a missing or non-positive day count means a single day.
pub fn infer_dates(
    name: &str,
    explicit_start: Option<NaiveDateTime>,
    days: Option<i64>,
    today: NaiveDate,
) -> (NaiveDateTime, NaiveDateTime) {
    let start = explicit_start.unwrap_or_else(|| parse_date_from_name(name, today));
    let days = days.filter(|d| *d > 0).unwrap_or(1);
    (start, start + Duration::days(days - 1))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfpWindow {
    pub status: CfpStatus,
    pub open_at: NaiveDateTime,
    pub close_at: NaiveDateTime,
}

/// CFP window for a newly created event.
///
/// Opens today and closes two weeks before the start. For upcoming events a
/// close date already in the past is moved to today, which yields an empty
/// window when the event is less than two weeks away.
pub fn cfp_window(start: NaiveDateTime, is_past: bool, today: NaiveDate) -> CfpWindow {
    let open_at = midnight(today);
    let mut close_at = start - Duration::days(CFP_CLOSE_LEAD_DAYS);
    if !is_past && close_at < open_at {
        close_at = open_at;
    }

    CfpWindow {
        status: if is_past {
            CfpStatus::Closed
        } else {
            CfpStatus::Open
        },
        open_at,
        close_at,
    }
}

/// Human-readable date used by description templates, e.g. `1 July 2026`.
pub fn format_long_date(date: NaiveDateTime) -> String {
    date.format("%-d %B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quarter_and_year_from_name() {
        let today = day(2026, 10, 17);
        assert_eq!(
            parse_date_from_name("SRE Day Q3 2026", today),
            midnight(day(2026, 7, 1))
        );
        assert_eq!(
            parse_date_from_name("2027-london-q4", today),
            midnight(day(2027, 10, 1))
        );
    }

    #[test]
    fn missing_quarter_defaults_to_january() {
        let today = day(2026, 10, 17);
        assert_eq!(
            parse_date_from_name("GopherCon 2028", today),
            midnight(day(2028, 1, 1))
        );
        assert_eq!(
            parse_date_from_name("Mystery Meetup", today),
            midnight(day(2026, 1, 1))
        );
    }

    #[test]
    fn explicit_start_wins() {
        let today = day(2026, 10, 17);
        let explicit = parse_start_time("2026-03-12T09:00:00Z");
        let (start, end) = infer_dates("SRE Day Q3 2026", explicit, Some(2), today);
        assert_eq!(start, day(2026, 3, 12).and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(end, day(2026, 3, 13).and_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn day_count_defaults_to_one() {
        let today = day(2026, 10, 17);
        let (start, end) = infer_dates("SRE Day Q2 2026", None, None, today);
        assert_eq!(start, end);
        let (start, end) = infer_dates("SRE Day Q2 2026", None, Some(0), today);
        assert_eq!(start, end);
    }

    #[test]
    fn start_time_formats() {
        assert_eq!(
            parse_start_time("2026-05-01T10:00:00+02:00"),
            Some(day(2026, 5, 1).and_hms_opt(8, 0, 0).unwrap())
        );
        assert_eq!(parse_start_time("2026-05-01"), Some(midnight(day(2026, 5, 1))));
        assert_eq!(parse_start_time("next tuesday"), None);
        assert_eq!(parse_iso_date("2026-13-01"), None);
    }

    #[test]
    fn cfp_closes_two_weeks_before_start() {
        let today = day(2026, 1, 1);
        let window = cfp_window(midnight(day(2026, 6, 15)), false, today);
        assert_eq!(window.status, CfpStatus::Open);
        assert_eq!(window.open_at, midnight(today));
        assert_eq!(window.close_at, midnight(day(2026, 6, 1)));
    }

    #[test]
    fn near_term_event_gets_empty_window() {
        let today = day(2026, 10, 17);
        // Starts in ten days: the close date would be four days ago.
        let window = cfp_window(midnight(day(2026, 10, 27)), false, today);
        assert_eq!(window.open_at, window.close_at);
        assert_eq!(window.close_at, midnight(today));

        // Exactly fourteen days away is the boundary: still empty.
        let window = cfp_window(midnight(day(2026, 10, 31)), false, today);
        assert_eq!(window.open_at, window.close_at);

        // One day further and the window opens up.
        let window = cfp_window(midnight(day(2026, 11, 1)), false, today);
        assert_eq!(window.close_at - window.open_at, Duration::days(1));
    }

    #[test]
    fn past_events_are_closed_and_not_clamped() {
        let today = day(2026, 10, 17);
        let window = cfp_window(midnight(day(2026, 3, 1)), true, today);
        assert_eq!(window.status, CfpStatus::Closed);
        assert_eq!(window.close_at, midnight(day(2026, 2, 15)));
    }

    #[test]
    fn long_date_format() {
        assert_eq!(format_long_date(midnight(day(2026, 7, 1))), "1 July 2026");
    }
}
