//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod fields;
pub mod leveling;
pub mod player;
pub mod pagination;

pub use validation::ValidationError;
pub use fields::{Birthday, Experience, PlayerName, PlayerTitle, MAX_EXPERIENCE};
pub use leveling::Progress;
pub use player::{NewPlayer, Player, PlayerDraft, PlayerPatch, PlayerRecord, Profession, Race};
pub use pagination::{PageRequest, PlayerOrder, DEFAULT_PAGE_SIZE};
