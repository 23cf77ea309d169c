//! Clock and time zone policy
//!
//! Every "now" the bot reasons about comes from a [`Clock`] pinned to the
//! configured fixed offset. Host-local time is never consulted.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use std::sync::{Arc, Mutex};

/// Source of the current time in the deployment's time zone
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock projected into a fixed offset
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: FixedOffset,
}

impl SystemClock {
    pub fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.zone)
    }
}

/// Manually driven clock for tests
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Naive layouts accepted for stored timestamps that lost their offset
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a persisted timestamp.
///
/// RFC 3339 values keep their own offset (comparisons across offsets are exact
/// in chrono). Values without an offset are read as local time in `zone`.
/// Returns `None` when nothing matches.
pub fn parse_stored(raw: &str, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .and_then(|naive| zone.from_local_datetime(&naive).single())
}

/// Build a timestamp in `zone` from calendar fields (tests and fixtures)
pub fn at(
    zone: FixedOffset,
    y: i32,
    mo: u32,
    d: u32,
    h: u32,
    mi: u32,
) -> Option<DateTime<FixedOffset>> {
    zone.with_ymd_and_hms(y, mo, d, h, mi, 0).single()
}

/// UTC+9, the zone the bot's audience lives in
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_uses_configured_offset() {
        let clock = SystemClock::new(jst());
        assert_eq!(clock.now().offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let start = at(jst(), 2024, 5, 1, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(clock.now(), at(jst(), 2024, 5, 1, 0, 5).unwrap());
    }

    #[test]
    fn test_fixed_clock_set_is_shared_between_clones() {
        let clock = FixedClock::new(at(jst(), 2024, 5, 1, 0, 0).unwrap());
        let injected: Arc<dyn Clock> = Arc::new(clock.clone());

        let later = at(jst(), 2024, 6, 1, 9, 30).unwrap();
        clock.set(later);
        assert_eq!(injected.now(), later);
    }

    #[test]
    fn test_parse_stored_rfc3339_keeps_offset() {
        let dt = parse_stored("2024-05-19T23:59:00+09:00", jst()).unwrap();
        assert_eq!(dt, at(jst(), 2024, 5, 19, 23, 59).unwrap());

        let utc = parse_stored("2024-05-19T14:59:00Z", jst()).unwrap();
        assert_eq!(utc, dt);
    }

    #[test]
    fn test_parse_stored_naive_assumes_zone() {
        let expected = at(jst(), 2024, 5, 19, 23, 59).unwrap();
        assert_eq!(parse_stored("2024-05-19T23:59:00", jst()), Some(expected));
        assert_eq!(parse_stored("2024-05-19T23:59:00.000000", jst()), Some(expected));
        assert_eq!(parse_stored("2024-05-19 23:59", jst()), Some(expected));
    }

    #[test]
    fn test_parse_stored_garbage() {
        assert!(parse_stored("", jst()).is_none());
        assert!(parse_stored("tomorrow-ish", jst()).is_none());
        assert!(parse_stored("2024-13-40T99:00:00", jst()).is_none());
    }
}
