//! In-memory player store
//!
//! Backs tests and `playerctl serve --in-memory`. Ids start at 1 and are
//! never reused, matching an identity column.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{DbError, PlayerStore};
use crate::filter::PlayerFilter;
use crate::models::{PageRequest, Player, PlayerOrder, PlayerRecord};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    players: BTreeMap<i64, Player>,
}

/// Player store held in process memory
#[derive(Debug, Default)]
pub struct MemoryPlayerStore {
    inner: RwLock<Inner>,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(order: PlayerOrder, a: &Player, b: &Player) -> Ordering {
    let by_field = match order {
        PlayerOrder::Id => Ordering::Equal,
        PlayerOrder::Name => a.name.cmp(&b.name),
        PlayerOrder::Experience => a.experience.cmp(&b.experience),
        PlayerOrder::Birthday => a.birthday.cmp(&b.birthday),
        PlayerOrder::Level => a.level.cmp(&b.level),
    };
    by_field.then(a.id.cmp(&b.id))
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> Result<Vec<Player>, DbError> {
        let inner = self.inner.read().await;
        let mut matching: Vec<&Player> =
            inner.players.values().filter(|p| filter.matches(p)).collect();
        matching.sort_by(|a, b| compare(order, a, b));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &PlayerFilter) -> Result<i64, DbError> {
        let inner = self.inner.read().await;
        Ok(inner.players.values().filter(|p| filter.matches(p)).count() as i64)
    }

    async fn get(&self, id: i64) -> Result<Option<Player>, DbError> {
        Ok(self.inner.read().await.players.get(&id).cloned())
    }

    async fn insert(&self, record: PlayerRecord) -> Result<Player, DbError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let player = record.with_id(inner.last_id);
        inner.players.insert(player.id, player.clone());
        Ok(player)
    }

    async fn update(&self, player: &Player) -> Result<Option<Player>, DbError> {
        let mut inner = self.inner.write().await;
        match inner.players.get_mut(&player.id) {
            Some(stored) => {
                *stored = player.clone();
                Ok(Some(player.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        Ok(self.inner.write().await.players.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::models::{Profession, Race};

    fn record(name: &str, experience: i32, year: i32) -> PlayerRecord {
        PlayerRecord {
            name: name.into(),
            title: String::new(),
            race: Race::Orc,
            profession: Profession::Warrior,
            birthday: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            banned: false,
            experience,
            level: 0,
            until_next_level: 0,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential_and_not_reused() {
        let store = MemoryPlayerStore::new();
        let a = store.insert(record("a", 0, 2001)).await.unwrap();
        let b = store.insert(record("b", 0, 2001)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(store.delete(b.id).await.unwrap());
        let c = store.insert(record("c", 0, 2001)).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn list_sorts_with_id_tiebreak_and_pages() {
        let store = MemoryPlayerStore::new();
        store.insert(record("Zed", 50, 2001)).await.unwrap();
        store.insert(record("Amy", 50, 2002)).await.unwrap();
        store.insert(record("Bob", 10, 2003)).await.unwrap();

        let all = PageRequest::new(None, Some(10)).unwrap();
        let by_exp = store
            .list(&PlayerFilter::new(), PlayerOrder::Experience, all)
            .await
            .unwrap();
        let ids: Vec<i64> = by_exp.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let second_page = PageRequest::new(Some(1), Some(2)).unwrap();
        let by_name = store
            .list(&PlayerFilter::new(), PlayerOrder::Name, second_page)
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Zed");
    }

    #[tokio::test]
    async fn count_ignores_pagination() {
        let store = MemoryPlayerStore::new();
        for i in 0..5 {
            store.insert(record("p", i * 100, 2001)).await.unwrap();
        }

        let filter = PlayerFilter::new().experience(Some(100), None);
        assert_eq!(store.count(&filter).await.unwrap(), 4);
        assert_eq!(
            store
                .list(&filter, PlayerOrder::Id, PageRequest::default())
                .await
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let store = MemoryPlayerStore::new();
        let player = record("ghost", 0, 2001).with_id(42);
        assert!(store.update(&player).await.unwrap().is_none());
        assert!(!store.delete(42).await.unwrap());
    }
}
