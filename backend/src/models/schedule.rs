//! Weekly availability schedules.
//!
//! A restaurant publishes one [`Interval`] per [`Weekday`]. On the wire a schedule is a
//! JSON object keyed by lowercase day name, where each value is either an empty list
//! (closed all day) or a two-element list `["HH:MM:SS", "HH:MM:SS"]`.
//!
//! Times are kept as validated `HH:MM:SS` strings and compared lexicographically.
//! For fixed-width zero-padded values this matches chronological order, except that
//! the hour range check only bounds the hour field to `"00"..="24"`, so `24:30:00`
//! is accepted.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::weekday::Weekday;

/// Untyped schedule candidate as received from a client.
///
/// Keys are arbitrary strings; only the seven canonical day names are read.
pub type RawWeeklySchedule = BTreeMap<String, Vec<String>>;

static TIME_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$").expect("time format pattern is valid")
});

const MIN_HOUR: &str = "00";
const MAX_HOUR: &str = "24";

/// Reason a single day's interval was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    #[error("expected 0 or 2 time values, got {0}")]
    InvalidLength(usize),

    #[error("'{0}' is not in HH:MM:SS format")]
    InvalidFormat(String),

    #[error("opening time {open} must be before closing time {close}")]
    NotAscending { open: String, close: String },

    #[error("hour out of range in {open}-{close}")]
    HourOutOfRange { open: String, close: String },
}

/// Reason a weekly schedule candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("missing schedule entry for {0}")]
    MissingDay(Weekday),

    #[error("{day}: {reason}")]
    InvalidDay {
        day: Weekday,
        #[source]
        reason: IntervalError,
    },
}

impl ScheduleError {
    /// Day the error refers to.
    pub fn day(&self) -> Weekday {
        match self {
            ScheduleError::MissingDay(day) => *day,
            ScheduleError::InvalidDay { day, .. } => *day,
        }
    }
}

/// A validated `HH:MM:SS` time of day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(String);

impl TimeOfDay {
    /// Parse a time of day, checking only the `HH:MM:SS` shape.
    pub fn parse(value: &str) -> Result<Self, IntervalError> {
        if TIME_FORMAT.is_match(value) {
            Ok(TimeOfDay(value.to_string()))
        } else {
            Err(IntervalError::InvalidFormat(value.to_string()))
        }
    }

    /// UTC time of day of `timestamp`, truncated to whole seconds.
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        TimeOfDay(timestamp.format("%H:%M:%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn hour(&self) -> &str {
        self.field(0..2)
    }

    pub fn minute(&self) -> &str {
        self.field(3..5)
    }

    pub fn second(&self) -> &str {
        self.field(6..8)
    }

    fn field(&self, range: std::ops::Range<usize>) -> &str {
        self.0.get(range).unwrap_or_default()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = IntervalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TimeOfDay::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.0
    }
}

/// Opening hours for a single day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum Interval {
    /// Not open at all on this day.
    #[default]
    Closed,
    /// Open from `open` to `close`.
    Open { open: TimeOfDay, close: TimeOfDay },
}

impl Interval {
    /// Validate a day's raw time list.
    ///
    /// Checks run in a fixed order: list length, then the format of every entry,
    /// then ordering (hour, minute, second in turn), then the hour range.
    pub fn parse(values: &[String]) -> Result<Self, IntervalError> {
        if !(values.is_empty() || values.len() == 2) {
            return Err(IntervalError::InvalidLength(values.len()));
        }

        let times = values
            .iter()
            .map(|v| TimeOfDay::parse(v))
            .collect::<Result<Vec<_>, _>>()?;

        let (open, close) = match <[TimeOfDay; 2]>::try_from(times) {
            Ok([open, close]) => (open, close),
            Err(_) => return Ok(Interval::Closed),
        };

        let not_ascending = if open.hour() > close.hour() {
            true
        } else if open.hour() == close.hour() && open.minute() > close.minute() {
            true
        } else {
            open.hour() == close.hour()
                && open.minute() == close.minute()
                && open.second() >= close.second()
        };
        if not_ascending {
            return Err(IntervalError::NotAscending {
                open: open.0,
                close: close.0,
            });
        }

        if !(hour_in_range(open.hour()) && hour_in_range(close.hour())) {
            return Err(IntervalError::HourOutOfRange {
                open: open.0,
                close: close.0,
            });
        }

        Ok(Interval::Open { open, close })
    }

    pub fn open(open: TimeOfDay, close: TimeOfDay) -> Self {
        Interval::Open { open, close }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Interval::Closed)
    }

    /// Whether `time` falls inside the interval, inclusive at both ends.
    pub fn contains(&self, time: &TimeOfDay) -> bool {
        match self {
            Interval::Closed => false,
            Interval::Open { open, close } => {
                open.as_str() <= time.as_str() && time.as_str() <= close.as_str()
            }
        }
    }
}

fn hour_in_range(hour: &str) -> bool {
    hour >= MIN_HOUR && hour <= MAX_HOUR
}

impl TryFrom<Vec<String>> for Interval {
    type Error = IntervalError;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        Interval::parse(&values)
    }
}

impl From<Interval> for Vec<String> {
    fn from(interval: Interval) -> Self {
        match interval {
            Interval::Closed => Vec::new(),
            Interval::Open { open, close } => vec![open.0, close.0],
        }
    }
}

/// Opening hours for every day of the week.
///
/// All seven days are always present; construct one from a candidate with
/// [`WeeklySchedule::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeeklySchedule", into = "RawWeeklySchedule")]
pub struct WeeklySchedule {
    days: [Interval; 7],
}

impl WeeklySchedule {
    /// Validate a raw candidate, reporting the first offending day in Sunday-first order.
    pub fn parse(raw: &RawWeeklySchedule) -> Result<Self, ScheduleError> {
        let mut days: [Interval; 7] = Default::default();
        for day in Weekday::ALL {
            let values = raw.get(day.name()).ok_or(ScheduleError::MissingDay(day))?;
            days[day.index()] = Interval::parse(values)
                .map_err(|reason| ScheduleError::InvalidDay { day, reason })?;
        }
        Ok(Self { days })
    }

    /// A schedule that is closed every day.
    pub fn closed() -> Self {
        Self::default()
    }

    /// Replace the interval for one day.
    pub fn with_day(mut self, day: Weekday, interval: Interval) -> Self {
        self.days[day.index()] = interval;
        self
    }

    pub fn interval(&self, day: Weekday) -> &Interval {
        &self.days[day.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &Interval)> {
        Weekday::ALL.into_iter().zip(self.days.iter())
    }

    pub fn to_raw(&self) -> RawWeeklySchedule {
        self.clone().into()
    }
}

impl TryFrom<RawWeeklySchedule> for WeeklySchedule {
    type Error = ScheduleError;

    fn try_from(raw: RawWeeklySchedule) -> Result<Self, Self::Error> {
        WeeklySchedule::parse(&raw)
    }
}

impl From<WeeklySchedule> for RawWeeklySchedule {
    fn from(schedule: WeeklySchedule) -> Self {
        Weekday::ALL
            .into_iter()
            .zip(schedule.days)
            .map(|(day, interval)| (day.name().to_string(), interval.into()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn raw_with(day: Weekday, values: &[&str]) -> RawWeeklySchedule {
        let mut raw: RawWeeklySchedule = Weekday::ALL
            .iter()
            .map(|d| (d.name().to_string(), strings(&["09:00:00", "17:00:00"])))
            .collect();
        raw.insert(day.name().to_string(), strings(values));
        raw
    }

    #[test]
    fn test_empty_list_is_closed() {
        assert_eq!(Interval::parse(&[]).unwrap(), Interval::Closed);
    }

    #[test]
    fn test_length_checked_before_format() {
        let err = Interval::parse(&strings(&["nope"])).unwrap_err();
        assert_eq!(err, IntervalError::InvalidLength(1));

        let err = Interval::parse(&strings(&["09:00:00", "10:00:00", "11:00:00"])).unwrap_err();
        assert_eq!(err, IntervalError::InvalidLength(3));
    }

    #[test]
    fn test_format_rejects_non_ascii_and_fractional() {
        for bad in ["9:00:00", "09:00", "09:00:00.000", "٠٩:00:00", "09:00:00\n", "ab:cd:ef"] {
            let err = Interval::parse(&strings(&[bad, "18:00:00"])).unwrap_err();
            assert!(matches!(err, IntervalError::InvalidFormat(_)), "{bad} accepted");
        }
    }

    #[test]
    fn test_ordering_short_circuits_by_field() {
        assert!(matches!(
            Interval::parse(&strings(&["10:00:00", "09:59:59"])),
            Err(IntervalError::NotAscending { .. })
        ));
        assert!(matches!(
            Interval::parse(&strings(&["10:30:00", "10:29:59"])),
            Err(IntervalError::NotAscending { .. })
        ));
        assert!(matches!(
            Interval::parse(&strings(&["10:30:30", "10:30:30"])),
            Err(IntervalError::NotAscending { .. })
        ));
        assert!(Interval::parse(&strings(&["10:30:30", "10:30:31"])).is_ok());
        // Later hour wins regardless of smaller minutes.
        assert!(Interval::parse(&strings(&["09:59:59", "10:00:00"])).is_ok());
    }

    #[test]
    fn test_hour_range_is_lexicographic_on_hour_only() {
        assert!(matches!(
            Interval::parse(&strings(&["09:00:00", "25:00:00"])),
            Err(IntervalError::HourOutOfRange { .. })
        ));
        assert!(Interval::parse(&strings(&["09:00:00", "24:00:00"])).is_ok());
        assert!(Interval::parse(&strings(&["09:00:00", "24:59:59"])).is_ok());
    }

    #[test]
    fn test_minute_out_of_range_passes_format() {
        // Only the hour is bounded; the pattern does not restrict minute values.
        assert!(Interval::parse(&strings(&["09:00:00", "10:61:00"])).is_ok());
    }

    #[test]
    fn test_schedule_requires_every_day() {
        let mut raw = raw_with(Weekday::Monday, &[]);
        raw.remove("thursday");
        assert_eq!(
            WeeklySchedule::parse(&raw).unwrap_err(),
            ScheduleError::MissingDay(Weekday::Thursday)
        );
    }

    #[test]
    fn test_schedule_reports_first_bad_day() {
        let mut raw = raw_with(Weekday::Friday, &["12:00:00", "12:00:00"]);
        raw.insert("tuesday".to_string(), strings(&["1"]));
        let err = WeeklySchedule::parse(&raw).unwrap_err();
        assert_eq!(err.day(), Weekday::Tuesday);
    }

    #[test]
    fn test_schedule_ignores_extra_keys() {
        let mut raw = raw_with(Weekday::Sunday, &[]);
        raw.insert("holiday".to_string(), strings(&["x"]));
        let schedule = WeeklySchedule::parse(&raw).unwrap();
        assert!(schedule.interval(Weekday::Sunday).is_closed());
        assert!(!schedule.to_raw().contains_key("holiday"));
    }

    #[test]
    fn test_schedule_json_shape() {
        let schedule = WeeklySchedule::closed().with_day(
            Weekday::Monday,
            Interval::parse(&strings(&["09:00:00", "17:00:00"])).unwrap(),
        );
        let value = serde_json::to_value(&schedule).unwrap();
        assert_eq!(value["monday"], serde_json::json!(["09:00:00", "17:00:00"]));
        assert_eq!(value["sunday"], serde_json::json!([]));

        let back: WeeklySchedule = serde_json::from_value(value).unwrap();
        assert_eq!(back, schedule);
    }

    #[test]
    fn test_deserialize_rejects_invalid_schedule() {
        let value = serde_json::json!({ "monday": ["09:00:00", "17:00:00"] });
        assert!(serde_json::from_value::<WeeklySchedule>(value).is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let interval = Interval::parse(&strings(&["09:00:00", "17:00:00"])).unwrap();
        let at = |s: &str| TimeOfDay::parse(s).unwrap();
        assert!(interval.contains(&at("09:00:00")));
        assert!(interval.contains(&at("17:00:00")));
        assert!(!interval.contains(&at("08:59:59")));
        assert!(!interval.contains(&at("17:00:01")));
        assert!(!Interval::Closed.contains(&at("12:00:00")));
    }
}
