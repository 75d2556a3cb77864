//! Liveness and store reachability

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::filter::PlayerFilter;
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Total stored players; absent when the store could not be queried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<i64>,
}

/// GET /health - 200 with the player count, 503 if the store is unreachable
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let version = env!("CARGO_PKG_VERSION");
    match state.players.count(&PlayerFilter::new()).await {
        Ok(players) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version,
                players: Some(players),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check could not reach player store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    version,
                    players: None,
                }),
            )
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::db::{DbError, MemoryPlayerStore, PlayerStore};
    use crate::models::{PageRequest, Player, PlayerOrder, PlayerRecord};
    use crate::service::PlayerService;

    /// Store whose every call fails
    struct BrokenStore;

    fn broken() -> DbError {
        DbError::Decode {
            column: "race",
            value: "?".into(),
        }
    }

    #[async_trait]
    impl PlayerStore for BrokenStore {
        async fn list(
            &self,
            _: &PlayerFilter,
            _: PlayerOrder,
            _: PageRequest,
        ) -> Result<Vec<Player>, DbError> {
            Err(broken())
        }
        async fn count(&self, _: &PlayerFilter) -> Result<i64, DbError> {
            Err(broken())
        }
        async fn get(&self, _: i64) -> Result<Option<Player>, DbError> {
            Err(broken())
        }
        async fn insert(&self, _: PlayerRecord) -> Result<Player, DbError> {
            Err(broken())
        }
        async fn update(&self, _: &Player) -> Result<Option<Player>, DbError> {
            Err(broken())
        }
        async fn delete(&self, _: i64) -> Result<bool, DbError> {
            Err(broken())
        }
    }

    fn state(store: impl PlayerStore + 'static) -> State<Arc<AppState>> {
        State(Arc::new(AppState::new(PlayerService::new(Arc::new(store)))))
    }

    #[tokio::test]
    async fn reports_player_count() {
        let (status, Json(body)) = health(state(MemoryPlayerStore::new())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.players, Some(0));
    }

    #[tokio::test]
    async fn unreachable_store_is_503() {
        let (status, Json(body)) = health(state(BrokenStore)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "unavailable");
        assert!(body.players.is_none());
    }
}
