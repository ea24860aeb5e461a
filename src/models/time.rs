use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Civil wall-clock time with minute resolution, stored as minutes since
/// midnight. All event times live in one fixed civil zone, so comparing two
/// `ClockTime` values on the same date is plain integer comparison rather
/// than string comparison or zone math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

/// Minutes in a civil day; `ClockTime` values are always below this.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error produced when parsing an `HH:MM` string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time '{input}': expected HH:MM between 00:00 and 23:59")]
pub struct ClockTimeParseError {
    pub input: String,
}

impl ClockTime {
    /// Create from minutes since midnight. Returns `None` past 23:59.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(ClockTime(minutes))
        } else {
            None
        }
    }

    /// Create from an hour/minute pair. Returns `None` when out of range.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(ClockTime(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }

    /// Checked addition in minutes; `None` when the result would leave the day.
    pub fn checked_add(&self, minutes: u16) -> Option<Self> {
        self.0.checked_add(minutes).and_then(Self::from_minutes)
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ClockTimeParseError {
            input: s.to_string(),
        };
        let (h, m) = s.split_once(':').ok_or_else(err)?;
        let hour: u16 = h.parse().map_err(|_| err())?;
        let minute: u16 = m.parse().map_err(|_| err())?;
        ClockTime::from_hm(hour, minute).ok_or_else(err)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> Self {
        t.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let t: ClockTime = "09:30".parse().unwrap();
        assert_eq!(t.minutes(), 9 * 60 + 30);
        assert_eq!(t.to_string(), "09:30");

        let midnight: ClockTime = "00:00".parse().unwrap();
        assert_eq!(midnight.minutes(), 0);

        let last: ClockTime = "23:59".parse().unwrap();
        assert_eq!(last.minutes(), MINUTES_PER_DAY - 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("1230".parse::<ClockTime>().is_err());
        assert!("ab:cd".parse::<ClockTime>().is_err());
        assert!("".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_ordering_is_numeric_not_lexicographic() {
        // "9:30" vs "11:30" would compare wrong as strings.
        let a = ClockTime::from_hm(9, 30).unwrap();
        let b = ClockTime::from_hm(11, 30).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_from_minutes_bounds() {
        assert!(ClockTime::from_minutes(MINUTES_PER_DAY).is_none());
        assert_eq!(
            ClockTime::from_minutes(MINUTES_PER_DAY - 1).unwrap().to_string(),
            "23:59"
        );
    }

    #[test]
    fn test_checked_add() {
        let t = ClockTime::from_hm(23, 0).unwrap();
        assert_eq!(t.checked_add(59).unwrap().to_string(), "23:59");
        assert!(t.checked_add(60).is_none());
        // The sum itself must not wrap before the range check.
        assert!(t.checked_add(u16::MAX).is_none());
    }

    #[test]
    fn test_serde_as_string() {
        let t = ClockTime::from_hm(13, 5).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"13:05\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
