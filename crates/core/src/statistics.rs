//! Formatting and ranking helpers for the statistics dashboard.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::types::Timestamp;

/// Number of annotators shown in the leaderboard.
pub const TOP_ANNOTATORS_LIMIT: usize = 5;

/// Number of entries in the recent-activity feed.
pub const RECENT_ACTIVITY_LIMIT: i64 = 5;

/// Length of the daily annotation trend, today included.
pub const TREND_DAYS: u32 = 7;

/// Day-over-day percentage change, e.g. `+12.5%`.
///
/// With no previous value the change is `+100%` if anything appeared and
/// `N/A` otherwise.
pub fn percentage_change(previous: i64, current: i64) -> String {
    if previous == 0 {
        return if current > 0 { "+100%".into() } else { "N/A".into() };
    }
    let change = (current - previous) as f64 * 100.0 / previous as f64;
    format!("{change:+.1}%")
}

/// Signed absolute change, e.g. `+3` or `-1`.
pub fn absolute_change(previous: i64, current: i64) -> String {
    format!("{:+}", current - previous)
}

/// Change between two percentages in percentage points, e.g. `-4.0%`.
pub fn percentage_point_change(previous: f64, current: f64) -> String {
    format!("{:+.1}%", current - previous)
}

/// Whole-number percentage label, e.g. `67%`.
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.0}%")
}

/// Humanized age of `then` relative to `now` ("Just now", "5 minutes ago").
pub fn relative_time(then: Timestamp, now: Timestamp) -> String {
    let elapsed = now - then;
    let minutes = elapsed.num_minutes().max(0);
    match minutes {
        0 => "Just now".into(),
        1 => "1 minute ago".into(),
        m if m < 60 => format!("{m} minutes ago"),
        _ => {
            let hours = elapsed.num_hours();
            if hours < 24 {
                return plural(hours, "hour");
            }
            plural(elapsed.num_days(), "day")
        }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// One annotator's leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatorScore {
    pub name: String,
    pub completion: i64,
}

/// Rank annotators by completion, highest first.
///
/// The sort is stable so ties keep their input order.
pub fn top_annotators(mut scores: Vec<AnnotatorScore>, limit: usize) -> Vec<AnnotatorScore> {
    scores.sort_by(|a, b| b.completion.cmp(&a.completion));
    scores.truncate(limit);
    scores
}

/// Annotation count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// First day covered by a `days`-long trend ending on `today`.
pub fn trend_start(today: NaiveDate, days: u32) -> NaiveDate {
    today - Duration::days(i64::from(days.saturating_sub(1)))
}

/// Expand sparse per-day counts into a contiguous, oldest-first series of
/// `days` entries ending on `today`. Missing days count as zero.
pub fn fill_daily_trend(
    counts: &HashMap<NaiveDate, i64>,
    today: NaiveDate,
    days: u32,
) -> Vec<DailyCount> {
    let start = trend_start(today, days);
    (0..i64::from(days))
        .map(|offset| {
            let date = start + Duration::days(offset);
            DailyCount {
                date,
                count: counts.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn percentage_change_from_zero() {
        assert_eq!(percentage_change(0, 0), "N/A");
        assert_eq!(percentage_change(0, 4), "+100%");
    }

    #[test]
    fn percentage_change_signs() {
        assert_eq!(percentage_change(4, 5), "+25.0%");
        assert_eq!(percentage_change(4, 3), "-25.0%");
        assert_eq!(percentage_change(4, 4), "+0.0%");
    }

    #[test]
    fn absolute_change_signs() {
        assert_eq!(absolute_change(3, 5), "+2");
        assert_eq!(absolute_change(5, 3), "-2");
        assert_eq!(absolute_change(2, 2), "+0");
    }

    #[test]
    fn point_change() {
        assert_eq!(percentage_point_change(50.0, 62.5), "+12.5%");
        assert_eq!(percentage_point_change(62.5, 50.0), "-12.5%");
    }

    #[test]
    fn rate_label() {
        assert_eq!(format_rate(66.4), "66%");
        assert_eq!(format_rate(0.0), "0%");
        assert_eq!(format_rate(100.0), "100%");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 5, 13, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now, now), "Just now");
        assert_eq!(relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(relative_time(now - Duration::minutes(60), now), "1 hour ago");
        assert_eq!(relative_time(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(relative_time(now - Duration::hours(24), now), "1 day ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
    }

    #[test]
    fn future_timestamps_are_just_now() {
        let now = Utc.with_ymd_and_hms(2025, 5, 13, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now + Duration::minutes(10), now), "Just now");
    }

    fn score(name: &str, completion: i64) -> AnnotatorScore {
        AnnotatorScore {
            name: name.into(),
            completion,
        }
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let scores = vec![
            score("a", 50),
            score("b", 80),
            score("c", 50),
            score("d", 100),
            score("e", 10),
            score("f", 50),
        ];
        let names: Vec<String> = top_annotators(scores, TOP_ANNOTATORS_LIMIT)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["d", "b", "a", "c", "f"]);
    }

    #[test]
    fn trend_is_zero_filled_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 13).unwrap();
        let mut counts = HashMap::new();
        counts.insert(NaiveDate::from_ymd_opt(2025, 5, 7).unwrap(), 2);
        counts.insert(today, 5);
        // Outside the window; ignored.
        counts.insert(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(), 9);

        let trend = fill_daily_trend(&counts, today, TREND_DAYS);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2025, 5, 7).unwrap());
        assert_eq!(trend[0].count, 2);
        assert_eq!(trend[6].date, today);
        assert_eq!(trend[6].count, 5);
        assert!(trend[1..6].iter().all(|d| d.count == 0));
    }
}
