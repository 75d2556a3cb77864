//! Storage trait shared by the PostgreSQL and in-memory backends

use async_trait::async_trait;

use crate::filter::PlayerFilter;
use crate::models::{PageRequest, Player, PlayerOrder, PlayerRecord};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("unexpected value '{value}' in column {column}")]
    Decode { column: &'static str, value: String },
}

/// Player persistence (testable)
///
/// Implementations only store and query; validation and derived fields are
/// handled by `PlayerService` before anything reaches a store.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// One page of players matching `filter`, sorted by `order` then id.
    async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> Result<Vec<Player>, DbError>;

    /// Number of players matching `filter`.
    async fn count(&self, filter: &PlayerFilter) -> Result<i64, DbError>;

    async fn get(&self, id: i64) -> Result<Option<Player>, DbError>;

    /// Insert and return the saved player with its new id.
    async fn insert(&self, record: PlayerRecord) -> Result<Player, DbError>;

    /// Replace a stored player; `None` if the id no longer exists.
    async fn update(&self, player: &Player) -> Result<Option<Player>, DbError>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool, DbError>;
}
