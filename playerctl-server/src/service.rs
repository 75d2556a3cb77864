//! Player operations on top of a `PlayerStore`
//!
//! Input arrives already validated (`NewPlayer`, `PlayerPatch`); the service
//! fills in derived fields and performs existence checks before acting.

use std::sync::Arc;

use crate::db::{DbError, PlayerStore};
use crate::filter::PlayerFilter;
use crate::models::{NewPlayer, PageRequest, Player, PlayerOrder, PlayerPatch, PlayerRecord};

/// Service-level error
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("player '{id}' not found")]
    NotFound { id: i64 },

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Player service, cheap to clone
#[derive(Clone)]
pub struct PlayerService {
    store: Arc<dyn PlayerStore>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> ServiceResult<Vec<Player>> {
        tracing::debug!(
            criteria = filter.criteria().len(),
            ?order,
            page = page.number,
            size = page.size,
            "listing players"
        );
        Ok(self.store.list(filter, order, page).await?)
    }

    pub async fn count(&self, filter: &PlayerFilter) -> ServiceResult<i64> {
        Ok(self.store.count(filter).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Player> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound { id })
    }

    pub async fn create(&self, new_player: NewPlayer) -> ServiceResult<Player> {
        let player = self.store.insert(PlayerRecord::from(new_player)).await?;
        tracing::info!(id = player.id, name = %player.name, level = player.level, "player created");
        Ok(player)
    }

    /// Overwrite the fields present in `patch`; others keep their values.
    pub async fn update(&self, id: i64, patch: PlayerPatch) -> ServiceResult<Player> {
        let mut player = self.get(id).await?;
        player.apply(patch);

        let saved = self
            .store
            .update(&player)
            .await?
            .ok_or(ServiceError::NotFound { id })?;
        tracing::info!(id, level = saved.level, "player updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.get(id).await?;

        if !self.store.delete(id).await? {
            // Removed by a concurrent request between the check and the delete
            return Err(ServiceError::NotFound { id });
        }
        tracing::info!(id, "player deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryPlayerStore;
    use crate::models::{PlayerDraft, Profession, Race};

    fn service() -> PlayerService {
        PlayerService::new(Arc::new(MemoryPlayerStore::new()))
    }

    fn new_player(name: &str, experience: i32) -> NewPlayer {
        NewPlayer::try_from(PlayerDraft {
            name: Some(name.into()),
            title: Some("Wanderer".into()),
            race: Some(Race::Human),
            profession: Some(Profession::Paladin),
            birthday: Some(1_000_000_000_000),
            banned: None,
            experience: Some(experience),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn create_computes_derived_fields() {
        let svc = service();
        let player = svc.create(new_player("Aragorn", 0)).await.unwrap();
        assert_eq!(player.level, 0);
        assert_eq!(player.until_next_level, 100);
        assert!(!player.banned);

        let player = svc.create(new_player("Boromir", 1_000)).await.unwrap();
        assert_eq!(player.level, 4);
        assert_eq!(player.until_next_level, 50 * 5 * 6 - 1_000);
    }

    #[tokio::test]
    async fn update_keeps_unspecified_fields() {
        let svc = service();
        let created = svc.create(new_player("Aragorn", 0)).await.unwrap();

        let patch = PlayerPatch::try_from(PlayerDraft {
            experience: Some(5_000),
            ..PlayerDraft::default()
        })
        .unwrap();
        let updated = svc.update(created.id, patch).await.unwrap();

        assert_eq!(updated.name, created.name);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.birthday, created.birthday);
        assert_eq!(updated.experience, 5_000);
        assert_eq!(updated.level, 9);
        assert_eq!(svc.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn missing_players_are_not_found() {
        let svc = service();
        assert!(matches!(
            svc.get(5).await,
            Err(ServiceError::NotFound { id: 5 })
        ));
        assert!(matches!(
            svc.update(5, PlayerPatch::default()).await,
            Err(ServiceError::NotFound { id: 5 })
        ));
        assert!(matches!(
            svc.delete(5).await,
            Err(ServiceError::NotFound { id: 5 })
        ));
    }

    #[tokio::test]
    async fn delete_removes_player() {
        let svc = service();
        let created = svc.create(new_player("Legolas", 10)).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert_eq!(svc.count(&PlayerFilter::new()).await.unwrap(), 0);
    }
}
