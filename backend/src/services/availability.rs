//! Availability checks against a restaurant's weekly schedule.
//!
//! Times of day are compared as `HH:MM:SS` strings. Two rules apply:
//!
//! - A reservation instant is admitted when `open <= time <= close` on its UTC weekday.
//! - A schedule is admitted only when every weekday is present and each open day has
//!   `open < close` with both hours between `"00"` and `"24"`.

use chrono::{DateTime, Utc};

use crate::api::{RawWeeklySchedule, TimeOfDay, Weekday, WeeklySchedule};

/// Whether `timestamp` falls inside the window for its UTC weekday.
///
/// Sub-second precision is truncated before comparing.
pub fn is_reservation_time_allowed(schedule: &WeeklySchedule, timestamp: DateTime<Utc>) -> bool {
    let day = Weekday::of(&timestamp);
    let time = TimeOfDay::of(&timestamp);
    schedule.interval(day).contains(&time)
}

/// Whether `candidate` would be accepted as a restaurant's `available_time`.
///
/// Use [`WeeklySchedule::parse`] to learn which day was rejected and why.
pub fn is_valid_weekly_schedule(candidate: &RawWeeklySchedule) -> bool {
    WeeklySchedule::parse(candidate).is_ok()
}
