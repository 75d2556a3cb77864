//! Validated player fields
//!
//! Each type can only be constructed through a fallible constructor, so a
//! `NewPlayer` or `PlayerPatch` holding them is valid by construction.

use chrono::{DateTime, Datelike, Utc};

use super::ValidationError;

const MIN_NAME_LEN: usize = 1;
const MAX_NAME_LEN: usize = 12;
const MAX_TITLE_LEN: usize = 30;
const MIN_BIRTH_YEAR: i32 = 2000;
const MAX_BIRTH_YEAR: i32 = 3000;

/// Upper bound for experience points
pub const MAX_EXPERIENCE: i32 = 10_000_000;

/// Player name, 1 to 12 characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    /// Create a player name, validating its length in characters.
    ///
    /// # Example
    /// ```
    /// use playerctl_server::models::PlayerName;
    ///
    /// assert!(PlayerName::new("Ниус").is_ok());
    /// assert!(PlayerName::new("").is_err());
    /// assert!(PlayerName::new("thirteenchars").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let len = s.chars().count();
        if len < MIN_NAME_LEN {
            return Err(ValidationError::TooShort {
                field: "name",
                min: MIN_NAME_LEN,
            });
        }
        if len > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Player title, at most 30 characters (may be empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTitle(String);

impl PlayerTitle {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Birthday with a non-negative timestamp and a UTC year in 2000..=3000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birthday(DateTime<Utc>);

impl Birthday {
    /// Build a birthday from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Result<Self, ValidationError> {
        if millis < 0 {
            return Err(ValidationError::InvalidFormat {
                field: "birthday",
                reason: "must not be before the Unix epoch".into(),
            });
        }

        let at = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            ValidationError::InvalidFormat {
                field: "birthday",
                reason: format!("timestamp {} is out of range", millis),
            }
        })?;

        if !(MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&at.year()) {
            return Err(ValidationError::OutOfRange {
                field: "birthday year",
                min: MIN_BIRTH_YEAR as i64,
                max: MAX_BIRTH_YEAR as i64,
            });
        }

        Ok(Self(at))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Experience points in 0..=10,000,000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Experience(i32);

impl Experience {
    pub fn new(points: i32) -> Result<Self, ValidationError> {
        if !(0..=MAX_EXPERIENCE).contains(&points) {
            return Err(ValidationError::OutOfRange {
                field: "experience",
                min: 0,
                max: MAX_EXPERIENCE as i64,
            });
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn millis(year: i32, month: u32, day: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn name_length_bounds() {
        assert!(PlayerName::new("a").is_ok());
        assert!(PlayerName::new(&"a".repeat(12)).is_ok());

        let err = PlayerName::new("").unwrap_err();
        assert!(matches!(err, ValidationError::TooShort { min: 1, .. }));

        let err = PlayerName::new(&"a".repeat(13)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 12, .. }));
    }

    #[test]
    fn name_counts_characters_not_bytes() {
        // 12 Cyrillic characters, 24 bytes
        assert!(PlayerName::new("АБВГДЕЖЗИЙКЛ").is_ok());
    }

    #[test]
    fn title_allows_empty_but_not_long() {
        assert!(PlayerTitle::new("").is_ok());
        assert!(PlayerTitle::new(&"t".repeat(30)).is_ok());

        let err = PlayerTitle::new(&"t".repeat(31)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 30, .. }));
    }

    #[test]
    fn birthday_year_window() {
        assert!(Birthday::from_millis(millis(2000, 1, 1)).is_ok());
        assert!(Birthday::from_millis(millis(3000, 12, 31)).is_ok());

        let err = Birthday::from_millis(millis(1999, 12, 31)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));

        let err = Birthday::from_millis(millis(3001, 1, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn birthday_rejects_negative_and_unrepresentable() {
        let err = Birthday::from_millis(-1).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));

        let err = Birthday::from_millis(i64::MAX).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn experience_bounds() {
        assert_eq!(Experience::new(0).unwrap().points(), 0);
        assert_eq!(Experience::new(MAX_EXPERIENCE).unwrap().points(), MAX_EXPERIENCE);
        assert!(Experience::new(-1).is_err());
        assert!(Experience::new(MAX_EXPERIENCE + 1).is_err());
    }
}
