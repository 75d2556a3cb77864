//! Composable player filters
//!
//! A `PlayerFilter` is a conjunction of `Criterion`s. Absent query
//! parameters add no criterion, so the empty filter matches every player.
//! Stores evaluate the same filter either in-process (`matches`) or as SQL
//! (see `db::postgres::push_filter`); both must agree.

use chrono::{DateTime, Utc};

use crate::models::{Player, Profession, Race, ValidationError};

/// Inclusive interval where either side may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Range<T> {
    /// `None` when both bounds are absent.
    pub fn new(min: Option<T>, max: Option<T>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Self { min, max })
        }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// A single predicate over a player
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Name contains the substring (case-sensitive)
    NameContains(String),
    /// Title contains the substring (case-sensitive)
    TitleContains(String),
    Race(Race),
    Profession(Profession),
    Banned(bool),
    Birthday(Range<DateTime<Utc>>),
    Experience(Range<i32>),
    Level(Range<i32>),
}

impl Criterion {
    pub fn matches(&self, player: &Player) -> bool {
        match self {
            Self::NameContains(needle) => player.name.contains(needle.as_str()),
            Self::TitleContains(needle) => player.title.contains(needle.as_str()),
            Self::Race(race) => player.race == *race,
            Self::Profession(profession) => player.profession == *profession,
            Self::Banned(banned) => player.banned == *banned,
            Self::Birthday(range) => range.contains(player.birthday),
            Self::Experience(range) => range.contains(player.experience),
            Self::Level(range) => range.contains(player.level),
        }
    }
}

/// Conjunction of criteria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerFilter {
    criteria: Vec<Criterion>,
}

impl PlayerFilter {
    /// Filter that matches every player.
    pub fn new() -> Self {
        Self::default()
    }

    /// AND another criterion onto this filter.
    pub fn and(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// AND a criterion if one is given.
    pub fn and_maybe(self, criterion: Option<Criterion>) -> Self {
        match criterion {
            Some(c) => self.and(c),
            None => self,
        }
    }

    pub fn name(self, needle: Option<String>) -> Self {
        self.and_maybe(needle.map(Criterion::NameContains))
    }

    pub fn title(self, needle: Option<String>) -> Self {
        self.and_maybe(needle.map(Criterion::TitleContains))
    }

    pub fn race(self, race: Option<Race>) -> Self {
        self.and_maybe(race.map(Criterion::Race))
    }

    pub fn profession(self, profession: Option<Profession>) -> Self {
        self.and_maybe(profession.map(Criterion::Profession))
    }

    pub fn banned(self, banned: Option<bool>) -> Self {
        self.and_maybe(banned.map(Criterion::Banned))
    }

    /// Birthday bounds in milliseconds since the Unix epoch.
    pub fn birthday(self, after: Option<i64>, before: Option<i64>) -> Result<Self, ValidationError> {
        let after = after.map(|ms| millis_to_datetime("after", ms)).transpose()?;
        let before = before.map(|ms| millis_to_datetime("before", ms)).transpose()?;
        Ok(self.and_maybe(Range::new(after, before).map(Criterion::Birthday)))
    }

    pub fn experience(self, min: Option<i32>, max: Option<i32>) -> Self {
        self.and_maybe(Range::new(min, max).map(Criterion::Experience))
    }

    pub fn level(self, min: Option<i32>, max: Option<i32>) -> Self {
        self.and_maybe(Range::new(min, max).map(Criterion::Level))
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// True when the player satisfies every criterion.
    pub fn matches(&self, player: &Player) -> bool {
        self.criteria.iter().all(|c| c.matches(player))
    }
}

fn millis_to_datetime(field: &'static str, millis: i64) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| ValidationError::InvalidFormat {
        field,
        reason: format!("timestamp {} is out of range", millis),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn player(name: &str, experience: i32, level: i32, year: i32) -> Player {
        Player {
            id: 1,
            name: name.into(),
            title: "Keeper of the Gate".into(),
            race: Race::Elf,
            profession: Profession::Druid,
            birthday: Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap(),
            banned: false,
            experience,
            level,
            until_next_level: 0,
        }
    }

    fn millis(year: i32) -> i64 {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn empty_filter_matches_all() {
        let filter = PlayerFilter::new()
            .name(None)
            .race(None)
            .experience(None, None)
            .birthday(None, None)
            .unwrap();
        assert!(filter.is_empty());
        assert!(filter.matches(&player("Arwen", 0, 0, 2010)));
    }

    #[test]
    fn substring_is_case_sensitive() {
        let filter = PlayerFilter::new().name(Some("rwe".into()));
        assert!(filter.matches(&player("Arwen", 0, 0, 2010)));

        let filter = PlayerFilter::new().name(Some("ARW".into()));
        assert!(!filter.matches(&player("Arwen", 0, 0, 2010)));
    }

    #[test]
    fn one_sided_bounds_are_independent() {
        let only_min = PlayerFilter::new().experience(Some(100), None);
        assert!(only_min.matches(&player("a", 100, 1, 2010)));
        assert!(only_min.matches(&player("a", 5_000_000, 1, 2010)));
        assert!(!only_min.matches(&player("a", 99, 0, 2010)));

        let only_max = PlayerFilter::new().level(None, Some(3));
        assert!(only_max.matches(&player("a", 0, 3, 2010)));
        assert!(!only_max.matches(&player("a", 0, 4, 2010)));
    }

    #[test]
    fn after_bound_alone_is_inclusive_lower_bound() {
        let filter = PlayerFilter::new().birthday(Some(millis(2010)), None).unwrap();
        assert!(filter.matches(&player("a", 0, 0, 2010)));
        assert!(filter.matches(&player("a", 0, 0, 2900)));
        assert!(!filter.matches(&player("a", 0, 0, 2009)));
    }

    #[test]
    fn criteria_combine_with_and() {
        let filter = PlayerFilter::new()
            .name(Some("Ar".into()))
            .race(Some(Race::Elf))
            .banned(Some(false))
            .experience(Some(10), Some(20));

        assert_eq!(filter.criteria().len(), 4);
        assert!(filter.matches(&player("Arwen", 15, 0, 2010)));
        assert!(!filter.matches(&player("Arwen", 25, 0, 2010)));

        let filter = filter.profession(Some(Profession::Warrior));
        assert!(!filter.matches(&player("Arwen", 15, 0, 2010)));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let filter = PlayerFilter::new().experience(Some(500), Some(100));
        assert!(!filter.matches(&player("a", 300, 2, 2010)));
    }

    #[test]
    fn unrepresentable_birthday_bound_is_rejected() {
        let err = PlayerFilter::new().birthday(None, Some(i64::MAX)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "before", .. }));
    }
}
