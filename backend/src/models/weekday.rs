//! Day-of-week enumeration used to index weekly schedules.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar weekday, ordered Sunday first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All seven days in Sunday-first order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Canonical lowercase name, as used for schedule keys.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }

    /// Zero-based position in the Sunday-first week.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Weekday of the UTC calendar day containing `timestamp`.
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        match timestamp.weekday() {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.name() == s)
            .ok_or_else(|| format!("Unknown weekday: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sunday_first_indices() {
        assert_eq!(Weekday::Sunday.index(), 0);
        assert_eq!(Weekday::Saturday.index(), 6);
        for (i, day) in Weekday::ALL.iter().enumerate() {
            assert_eq!(day.index(), i);
        }
    }

    #[test]
    fn test_weekday_of_uses_utc_day() {
        // 2024-01-01 was a Monday.
        let monday = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        assert_eq!(Weekday::of(&monday), Weekday::Monday);

        // 23:30 on Sunday at UTC-05:00 is already Monday in UTC.
        let ts = DateTime::parse_from_rfc3339("2023-12-31T23:30:00-05:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(Weekday::of(&ts), Weekday::Monday);
    }

    #[test]
    fn test_from_str_round_trips_names() {
        for day in Weekday::ALL {
            assert_eq!(day.name().parse::<Weekday>().unwrap(), day);
        }
        assert!("Monday".parse::<Weekday>().is_err());
    }
}
