//! Date and time range resolution
//!
//! Turns the abstract selection of a range facet into concrete boundaries:
//! unix seconds for the date facet, `HH:mm` strings for the time facet.
//!
//! Date presets are relative to "now" and are recomputed on every apply.
//! Day boundaries are taken in the clock's time zone and are inclusive
//! (`00:00:00` to `23:59:59`). Resolution never fails; anything that cannot
//! be resolved comes back as `None`, meaning unbounded on that side.

use crate::engine::{CustomRange, RangeState};
use crate::engine::state::TIME_FORMAT;
use crate::facets::presets;
use chrono::{DateTime, Days, Local, Months, NaiveDate, TimeZone};

/// Source of "now" for preset resolution
pub trait Clock {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone> {
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    #[must_use]
    pub const fn new(now: DateTime<Tz>) -> Self {
        Self { now }
    }
}

impl<Tz: TimeZone> Clock for FixedClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.now.clone()
    }
}

/// Resolved date boundaries in unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateBoundaries {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// Resolved wall-clock boundaries as `HH:mm`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeBoundaries {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Resolve the date facet against `now`
///
/// A selected preset always wins over a custom range.
#[must_use]
pub fn resolve_dates<Tz: TimeZone>(state: &RangeState, now: &DateTime<Tz>) -> DateBoundaries {
    let tz = now.timezone();

    if let Some(preset) = state.preset() {
        let today = now.date_naive();
        let start = match preset {
            presets::TODAY => Some(today),
            presets::LAST_7_DAYS => today.checked_sub_days(Days::new(7)),
            presets::LAST_30_DAYS => today.checked_sub_days(Days::new(30)),
            presets::LAST_6_MONTHS => today.checked_sub_months(Months::new(6)),
            _ => return DateBoundaries::default(),
        };
        return DateBoundaries {
            from: start.and_then(|date| start_of_day(date, &tz)),
            to: end_of_day(today, &tz),
        };
    }

    match state.custom() {
        Some(CustomRange::Dates(bounds)) => DateBoundaries {
            from: bounds.from.and_then(|date| start_of_day(date, &tz)),
            to: bounds.to.and_then(|date| end_of_day(date, &tz)),
        },
        _ => DateBoundaries::default(),
    }
}

/// Resolve the time facet
///
/// Time presets are fixed wall-clock windows; custom times pass through.
#[must_use]
pub fn resolve_times(state: &RangeState) -> TimeBoundaries {
    if let Some(preset) = state.preset() {
        return time_preset_window(preset)
            .map(|(from, to)| TimeBoundaries {
                from: Some(from.to_string()),
                to: Some(to.to_string()),
            })
            .unwrap_or_default();
    }

    match state.custom() {
        Some(CustomRange::Times(bounds)) => TimeBoundaries {
            from: bounds.from.map(|t| t.format(TIME_FORMAT).to_string()),
            to: bounds.to.map(|t| t.format(TIME_FORMAT).to_string()),
        },
        _ => TimeBoundaries::default(),
    }
}

/// Wall-clock window of a time preset
#[must_use]
pub fn time_preset_window(preset: &str) -> Option<(&'static str, &'static str)> {
    match preset {
        presets::MORNING => Some(("00:00", "11:00")),
        presets::AFTERNOON => Some(("11:00", "17:00")),
        presets::EVENING => Some(("17:00", "21:00")),
        presets::ALL_DAY => Some(("00:00", "23:59")),
        _ => None,
    }
}

/// First second of `date` in `tz`, or `None` if midnight does not exist there
#[must_use]
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight).earliest().map(|dt| dt.timestamp())
}

/// Last second of `date` in `tz`
#[must_use]
pub fn end_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<i64> {
    let last = date.and_hms_opt(23, 59, 59)?;
    tz.from_local_datetime(&last).latest().map(|dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Bounds;
    use chrono::{FixedOffset, NaiveTime, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn preset(name: &str) -> RangeState {
        let mut state = RangeState::default();
        state.select_preset(name);
        state
    }

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap().timestamp()
    }

    #[test]
    fn test_last_7_days() {
        let resolved = resolve_dates(&preset(presets::LAST_7_DAYS), &now());
        assert_eq!(resolved.from, Some(1_709_856_000));
        assert_eq!(resolved.to, Some(1_710_547_199));
    }

    #[test]
    fn test_today() {
        let resolved = resolve_dates(&preset(presets::TODAY), &now());
        assert_eq!(resolved.from, Some(ts(2024, 3, 15, 0, 0, 0)));
        assert_eq!(resolved.to, Some(ts(2024, 3, 15, 23, 59, 59)));
    }

    #[test]
    fn test_last_30_days() {
        let resolved = resolve_dates(&preset(presets::LAST_30_DAYS), &now());
        assert_eq!(resolved.from, Some(ts(2024, 2, 14, 0, 0, 0)));
    }

    #[test]
    fn test_last_6_months_clamps_to_month_end() {
        let now = Utc.with_ymd_and_hms(2024, 8, 31, 9, 0, 0).unwrap();
        let resolved = resolve_dates(&preset(presets::LAST_6_MONTHS), &now);
        assert_eq!(resolved.from, Some(ts(2024, 2, 29, 0, 0, 0)));
        assert_eq!(resolved.to, Some(ts(2024, 8, 31, 23, 59, 59)));
    }

    #[test]
    fn test_day_boundaries_follow_clock_time_zone() {
        let berlin = FixedOffset::east_opt(3600).unwrap();
        let now = berlin.with_ymd_and_hms(2024, 3, 15, 0, 30, 0).unwrap();
        let resolved = resolve_dates(&preset(presets::TODAY), &now);
        assert_eq!(resolved.from, Some(ts(2024, 3, 14, 23, 0, 0)));
        assert_eq!(resolved.to, Some(ts(2024, 3, 15, 22, 59, 59)));
    }

    #[test]
    fn test_custom_dates_and_open_bounds() {
        let mut state = RangeState::default();
        state.set_custom(CustomRange::Dates(Bounds::new(
            NaiveDate::from_ymd_opt(2024, 1, 10),
            NaiveDate::from_ymd_opt(2024, 1, 20),
        )));
        let resolved = resolve_dates(&state, &now());
        assert_eq!(resolved.from, Some(ts(2024, 1, 10, 0, 0, 0)));
        assert_eq!(resolved.to, Some(ts(2024, 1, 20, 23, 59, 59)));

        let until = NaiveDate::from_ymd_opt(2024, 1, 20);
        state.set_custom(CustomRange::Dates(Bounds::new(None, until)));
        let resolved = resolve_dates(&state, &now());
        assert_eq!(resolved.from, None);
        assert_eq!(resolved.to, Some(ts(2024, 1, 20, 23, 59, 59)));
    }

    #[test]
    fn test_empty_and_unknown_resolve_to_none() {
        assert_eq!(resolve_dates(&RangeState::default(), &now()), DateBoundaries::default());
        assert_eq!(resolve_dates(&preset("fortnight"), &now()), DateBoundaries::default());
        assert_eq!(resolve_times(&preset("brunch")), TimeBoundaries::default());
    }

    #[test]
    fn test_time_presets() {
        let resolved = resolve_times(&preset(presets::AFTERNOON));
        assert_eq!(resolved.from.as_deref(), Some("11:00"));
        assert_eq!(resolved.to.as_deref(), Some("17:00"));

        let resolved = resolve_times(&preset(presets::ALL_DAY));
        assert_eq!(resolved.to.as_deref(), Some("23:59"));
    }

    #[test]
    fn test_custom_times_pass_through() {
        let mut state = RangeState::default();
        state.set_custom(CustomRange::Times(Bounds::new(NaiveTime::from_hms_opt(7, 45, 0), None)));
        let resolved = resolve_times(&state);
        assert_eq!(resolved.from.as_deref(), Some("07:45"));
        assert_eq!(resolved.to, None);
    }

    #[test]
    fn test_date_range_ignored_by_time_resolution() {
        let mut state = RangeState::default();
        let since = NaiveDate::from_ymd_opt(2024, 1, 1);
        state.set_custom(CustomRange::Dates(Bounds::new(since, None)));
        assert_eq!(resolve_times(&state), TimeBoundaries::default());
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(now());
        assert_eq!(clock.now(), now());
    }
}
