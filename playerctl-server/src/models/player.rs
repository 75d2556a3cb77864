//! Player entity and its write-side shapes
//!
//! - `Player`: a stored player, as served over the API
//! - `PlayerDraft`: raw request body, every field optional
//! - `NewPlayer` / `PlayerPatch`: validated create and update input
//! - `PlayerRecord`: an unsaved player with derived fields filled in

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{Birthday, Experience, PlayerName, PlayerTitle};
use super::leveling::Progress;
use super::ValidationError;

/// Player race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Race {
    Human,
    Dwarf,
    Elf,
    Giant,
    Orc,
    Troll,
    Hobbit,
}

impl Race {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "HUMAN",
            Self::Dwarf => "DWARF",
            Self::Elf => "ELF",
            Self::Giant => "GIANT",
            Self::Orc => "ORC",
            Self::Troll => "TROLL",
            Self::Hobbit => "HOBBIT",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Human,
            Self::Dwarf,
            Self::Elf,
            Self::Giant,
            Self::Orc,
            Self::Troll,
            Self::Hobbit,
        ]
    }
}

/// Player profession
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profession {
    Warrior,
    Rogue,
    Sorcerer,
    Cleric,
    Paladin,
    Nazgul,
    Warlock,
    Druid,
}

impl Profession {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warrior => "WARRIOR",
            Self::Rogue => "ROGUE",
            Self::Sorcerer => "SORCERER",
            Self::Cleric => "CLERIC",
            Self::Paladin => "PALADIN",
            Self::Nazgul => "NAZGUL",
            Self::Warlock => "WARLOCK",
            Self::Druid => "DRUID",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Warrior,
            Self::Rogue,
            Self::Sorcerer,
            Self::Cleric,
            Self::Paladin,
            Self::Nazgul,
            Self::Warlock,
            Self::Druid,
        ]
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Race {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|race| race.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "race",
                reason: format!("unknown race '{}'", s),
            })
    }
}

impl FromStr for Profession {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|profession| profession.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "profession",
                reason: format!("unknown profession '{}'", s),
            })
    }
}

/// Stored player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub birthday: DateTime<Utc>,
    pub banned: bool,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
}

impl Player {
    /// Overwrite every field present in `patch` and recompute progress.
    pub fn apply(&mut self, patch: PlayerPatch) {
        if let Some(name) = patch.name {
            self.name = name.into_string();
        }
        if let Some(title) = patch.title {
            self.title = title.into_string();
        }
        if let Some(race) = patch.race {
            self.race = race;
        }
        if let Some(profession) = patch.profession {
            self.profession = profession;
        }
        if let Some(birthday) = patch.birthday {
            self.birthday = birthday.as_datetime();
        }
        if let Some(banned) = patch.banned {
            self.banned = banned;
        }
        if let Some(experience) = patch.experience {
            self.experience = experience.points();
        }

        let progress = Progress::for_experience(self.experience);
        self.level = progress.level;
        self.until_next_level = progress.until_next_level;
    }
}

/// Request body for create and update, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDraft {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    /// Milliseconds since the Unix epoch
    pub birthday: Option<i64>,
    pub banned: Option<bool>,
    pub experience: Option<i32>,
}

/// Validated input for creating a player
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub name: PlayerName,
    pub title: PlayerTitle,
    pub race: Race,
    pub profession: Profession,
    pub birthday: Birthday,
    pub banned: bool,
    pub experience: Experience,
}

impl TryFrom<PlayerDraft> for NewPlayer {
    type Error = ValidationError;

    /// Every field except `banned` is required; `banned` defaults to false.
    fn try_from(draft: PlayerDraft) -> Result<Self, Self::Error> {
        // Range checks run before presence checks so a present-but-invalid
        // field is reported even when another field is missing.
        let patch = PlayerPatch::try_from(draft)?;

        Ok(Self {
            name: patch.name.ok_or(ValidationError::Missing { field: "name" })?,
            title: patch.title.ok_or(ValidationError::Missing { field: "title" })?,
            race: patch.race.ok_or(ValidationError::Missing { field: "race" })?,
            profession: patch
                .profession
                .ok_or(ValidationError::Missing { field: "profession" })?,
            birthday: patch
                .birthday
                .ok_or(ValidationError::Missing { field: "birthday" })?,
            banned: patch.banned.unwrap_or(false),
            experience: patch
                .experience
                .ok_or(ValidationError::Missing { field: "experience" })?,
        })
    }
}

/// Validated partial update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default)]
pub struct PlayerPatch {
    pub name: Option<PlayerName>,
    pub title: Option<PlayerTitle>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub birthday: Option<Birthday>,
    pub banned: Option<bool>,
    pub experience: Option<Experience>,
}

impl TryFrom<PlayerDraft> for PlayerPatch {
    type Error = ValidationError;

    fn try_from(draft: PlayerDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            name: draft.name.as_deref().map(PlayerName::new).transpose()?,
            title: draft.title.as_deref().map(PlayerTitle::new).transpose()?,
            race: draft.race,
            profession: draft.profession,
            birthday: draft.birthday.map(Birthday::from_millis).transpose()?,
            banned: draft.banned,
            experience: draft.experience.map(Experience::new).transpose()?,
        })
    }
}

/// Player ready to insert: validated fields plus derived progress
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: DateTime<Utc>,
    pub banned: bool,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
}

impl PlayerRecord {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: i64) -> Player {
        Player {
            id,
            name: self.name,
            title: self.title,
            race: self.race,
            profession: self.profession,
            birthday: self.birthday,
            banned: self.banned,
            experience: self.experience,
            level: self.level,
            until_next_level: self.until_next_level,
        }
    }
}

impl From<NewPlayer> for PlayerRecord {
    fn from(p: NewPlayer) -> Self {
        let experience = p.experience.points();
        let progress = Progress::for_experience(experience);

        Self {
            name: p.name.into_string(),
            title: p.title.into_string(),
            race: p.race,
            profession: p.profession,
            birthday: p.birthday.as_datetime(),
            banned: p.banned,
            experience,
            level: progress.level,
            until_next_level: progress.until_next_level,
        }
    }
}
