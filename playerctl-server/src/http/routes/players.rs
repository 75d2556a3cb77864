//! Player endpoints under /rest/players

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::filter::PlayerFilter;
use crate::http::error::ApiError;
use crate::http::extractors::{empty_as_none, PlayerId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{
    NewPlayer, PageRequest, Player, PlayerDraft, PlayerOrder, PlayerPatch, Profession, Race,
    ValidationError,
};

/// Query parameters shared by list and count
///
/// Count ignores `order`, `pageNumber` and `pageSize`. An empty value such as
/// `?minLevel=` is read as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerQuery {
    pub name: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub race: Option<Race>,
    #[serde(deserialize_with = "empty_as_none")]
    pub profession: Option<Profession>,
    /// Earliest birthday, epoch millis
    #[serde(deserialize_with = "empty_as_none")]
    pub after: Option<i64>,
    /// Latest birthday, epoch millis
    #[serde(deserialize_with = "empty_as_none")]
    pub before: Option<i64>,
    #[serde(deserialize_with = "empty_as_none")]
    pub banned: Option<bool>,
    #[serde(deserialize_with = "empty_as_none")]
    pub min_experience: Option<i32>,
    #[serde(deserialize_with = "empty_as_none")]
    pub max_experience: Option<i32>,
    #[serde(deserialize_with = "empty_as_none")]
    pub min_level: Option<i32>,
    #[serde(deserialize_with = "empty_as_none")]
    pub max_level: Option<i32>,
    #[serde(deserialize_with = "empty_as_none")]
    pub order: Option<PlayerOrder>,
    #[serde(deserialize_with = "empty_as_none")]
    pub page_number: Option<i64>,
    #[serde(deserialize_with = "empty_as_none")]
    pub page_size: Option<i64>,
}

impl PlayerQuery {
    pub fn filter(&self) -> Result<PlayerFilter, ValidationError> {
        Ok(PlayerFilter::new()
            .name(self.name.clone())
            .title(self.title.clone())
            .race(self.race)
            .profession(self.profession)
            .birthday(self.after, self.before)?
            .banned(self.banned)
            .experience(self.min_experience, self.max_experience)
            .level(self.min_level, self.max_level))
    }

    pub fn page(&self) -> Result<PageRequest, ValidationError> {
        PageRequest::new(self.page_number, self.page_size)
    }

    pub fn order(&self) -> PlayerOrder {
        self.order.unwrap_or_default()
    }
}

/// GET /rest/players - filtered, sorted page of players
async fn list_players(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<PlayerQuery>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let filter = query.filter()?;
    let page = query.page()?;
    let players = state.players.list(&filter, query.order(), page).await?;
    Ok(Json(players))
}

/// GET /rest/players/count - number of players matching the filters
async fn count_players(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<PlayerQuery>,
) -> Result<Json<i64>, ApiError> {
    let filter = query.filter()?;
    Ok(Json(state.players.count(&filter).await?))
}

/// GET /rest/players/{id}
async fn get_player(
    State(state): State<Arc<AppState>>,
    PlayerId(id): PlayerId,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(state.players.get(id).await?))
}

/// POST /rest/players - create a player; all fields but `banned` required
async fn create_player(
    State(state): State<Arc<AppState>>,
    ValidJson(draft): ValidJson<PlayerDraft>,
) -> Result<Json<Player>, ApiError> {
    let new_player = NewPlayer::try_from(draft)?;
    Ok(Json(state.players.create(new_player).await?))
}

/// POST /rest/players/{id} - partial update
async fn update_player(
    State(state): State<Arc<AppState>>,
    PlayerId(id): PlayerId,
    ValidJson(draft): ValidJson<PlayerDraft>,
) -> Result<Json<Player>, ApiError> {
    let patch = PlayerPatch::try_from(draft)?;
    Ok(Json(state.players.update(id, patch).await?))
}

/// DELETE /rest/players/{id}
async fn delete_player(
    State(state): State<Arc<AppState>>,
    PlayerId(id): PlayerId,
) -> Result<StatusCode, ApiError> {
    state.players.delete(id).await?;
    Ok(StatusCode::OK)
}

/// Player routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rest/players", get(list_players).post(create_player))
        .route("/rest/players/count", get(count_players))
        .route(
            "/rest/players/{id}",
            get(get_player).post(update_player).delete(delete_player),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;

    #[test]
    fn query_builds_only_present_criteria() {
        let query = PlayerQuery {
            name: Some("ar".into()),
            min_level: Some(2),
            ..PlayerQuery::default()
        };
        assert_eq!(query.filter().unwrap().criteria().len(), 2);
        assert_eq!(query.order(), PlayerOrder::Id);
        assert_eq!(query.page().unwrap(), PageRequest::default());
    }

    #[test]
    fn empty_query_is_unfiltered() {
        assert!(PlayerQuery::default().filter().unwrap().is_empty());
    }

    fn parse(query: &str) -> Result<PlayerQuery, String> {
        let uri = format!("http://localhost/rest/players?{query}").parse().unwrap();
        Query::<PlayerQuery>::try_from_uri(&uri)
            .map(|Query(q)| q)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn empty_values_read_as_absent() {
        let query = parse("race=&banned=&minLevel=&after=&order=&pageNumber=&pageSize=").unwrap();
        assert!(query.filter().unwrap().is_empty());
        assert_eq!(query.order(), PlayerOrder::Id);
        assert_eq!(query.page().unwrap(), PageRequest::default());
    }

    #[test]
    fn present_values_still_parse() {
        let query = parse("race=ELF&banned=true&maxLevel=4&order=LEVEL&pageSize=7").unwrap();
        assert_eq!(query.race, Some(Race::Elf));
        assert_eq!(query.banned, Some(true));
        assert_eq!(query.max_level, Some(4));
        assert_eq!(query.order(), PlayerOrder::Level);
        assert_eq!(query.page_size, Some(7));
    }

    #[test]
    fn unparseable_values_are_rejected() {
        for query in ["minLevel=abc", "banned=maybe", "order=HEIGHT", "race=BARD"] {
            assert!(parse(query).is_err(), "{query}");
        }
    }
}
