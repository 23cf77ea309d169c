//! Lead time parsing
//!
//! Accepts free text such as `1日2時間`, `3h`, `2 days 30min`. Days, hours and
//! minutes are each looked up independently; the first occurrence of a unit
//! counts and later repeats are ignored.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::Duration;
use regex::Regex;
use std::sync::OnceLock;

static DAYS: OnceLock<Regex> = OnceLock::new();
static HOURS: OnceLock<Regex> = OnceLock::new();
static MINUTES: OnceLock<Regex> = OnceLock::new();

fn days_pattern() -> &'static Regex {
    DAYS.get_or_init(|| Regex::new(r"(\d+)\s*(?:d|day|日)").expect("valid days pattern"))
}

fn hours_pattern() -> &'static Regex {
    HOURS.get_or_init(|| Regex::new(r"(\d+)\s*(?:h|hour|時間)").expect("valid hours pattern"))
}

fn minutes_pattern() -> &'static Regex {
    MINUTES.get_or_init(|| Regex::new(r"(\d+)\s*(?:m|min|分)").expect("valid minutes pattern"))
}

/// First integer attached to `pattern`, if any
fn first_amount(pattern: &Regex, text: &str) -> Option<i64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Parse a lead time expression into a fixed duration.
///
/// Returns `None` when no unit is recognised, when the amounts add up to zero,
/// or when the total does not fit a `chrono::Duration`.
pub fn parse_lead_time(text: &str) -> Option<Duration> {
    let units: [(&Regex, fn(i64) -> Option<Duration>); 3] = [
        (days_pattern(), Duration::try_days),
        (hours_pattern(), Duration::try_hours),
        (minutes_pattern(), Duration::try_minutes),
    ];

    let mut total = Duration::zero();
    for (pattern, to_duration) in units {
        if let Some(amount) = first_amount(pattern, text) {
            total = total.checked_add(&to_duration(amount)?)?;
        }
    }

    if total.is_zero() {
        None
    } else {
        Some(total)
    }
}
