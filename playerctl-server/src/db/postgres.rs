//! PostgreSQL player store
//!
//! Filters are rendered with `sqlx::QueryBuilder`, so every user value is a
//! bind parameter. Sort columns come from `PlayerOrder::column`, never from
//! request text.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow, Postgres};
use sqlx::{QueryBuilder, Row};

use super::store::{DbError, PlayerStore};
use crate::filter::{Criterion, PlayerFilter, Range};
use crate::models::{PageRequest, Player, PlayerOrder, PlayerRecord};

const PLAYER_COLUMNS: &str =
    "id, name, title, race, profession, birthday, banned, experience, level, until_next_level";

/// Player store backed by a `players` table
#[derive(Debug, Clone)]
pub struct PgPlayerStore {
    pool: PgPool,
}

impl PgPlayerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append ` WHERE ...` for a non-empty filter.
pub fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PlayerFilter) {
    for (i, criterion) in filter.criteria().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_criterion(builder, criterion);
    }
}

/// Append ` ORDER BY ...` with id as the tie-breaker.
///
/// Names sort by code point (`COLLATE "C"`) to match `MemoryPlayerStore`.
pub fn push_order(builder: &mut QueryBuilder<'_, Postgres>, order: PlayerOrder) {
    builder.push(" ORDER BY ").push(order.column());
    if order == PlayerOrder::Name {
        builder.push(" COLLATE \"C\"");
    }
    if order != PlayerOrder::Id {
        builder.push(", id");
    }
}

fn push_criterion(builder: &mut QueryBuilder<'_, Postgres>, criterion: &Criterion) {
    match criterion {
        // strpos avoids treating % and _ in the needle as LIKE wildcards
        Criterion::NameContains(needle) => {
            builder.push("strpos(name, ");
            builder.push_bind(needle.clone());
            builder.push(") > 0");
        }
        Criterion::TitleContains(needle) => {
            builder.push("strpos(title, ");
            builder.push_bind(needle.clone());
            builder.push(") > 0");
        }
        Criterion::Race(race) => {
            builder.push("race = ");
            builder.push_bind(race.as_str());
        }
        Criterion::Profession(profession) => {
            builder.push("profession = ");
            builder.push_bind(profession.as_str());
        }
        Criterion::Banned(banned) => {
            builder.push("banned = ");
            builder.push_bind(*banned);
        }
        Criterion::Birthday(range) => push_range(builder, "birthday", range),
        Criterion::Experience(range) => push_range(builder, "experience", range),
        Criterion::Level(range) => push_range(builder, "level", range),
    }
}

fn push_range<'args, T>(
    builder: &mut QueryBuilder<'args, Postgres>,
    column: &'static str,
    range: &Range<T>,
) where
    T: Copy + PartialOrd + Send + sqlx::Encode<'args, Postgres> + sqlx::Type<Postgres> + 'args,
{
    match (range.min, range.max) {
        (Some(min), Some(max)) => {
            builder.push(column).push(" BETWEEN ");
            builder.push_bind(min);
            builder.push(" AND ");
            builder.push_bind(max);
        }
        (Some(min), None) => {
            builder.push(column).push(" >= ");
            builder.push_bind(min);
        }
        (None, Some(max)) => {
            builder.push(column).push(" <= ");
            builder.push_bind(max);
        }
        (None, None) => {
            builder.push("TRUE");
        }
    }
}

fn player_from_row(row: &PgRow) -> Result<Player, DbError> {
    let race: String = row.try_get("race")?;
    let profession: String = row.try_get("profession")?;

    Ok(Player {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        title: row.try_get("title")?,
        race: race.parse().map_err(|_| DbError::Decode {
            column: "race",
            value: race.clone(),
        })?,
        profession: profession.parse().map_err(|_| DbError::Decode {
            column: "profession",
            value: profession.clone(),
        })?,
        birthday: row.try_get("birthday")?,
        banned: row.try_get("banned")?,
        experience: row.try_get("experience")?,
        level: row.try_get("level")?,
        until_next_level: row.try_get("until_next_level")?,
    })
}

#[async_trait]
impl PlayerStore for PgPlayerStore {
    async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> Result<Vec<Player>, DbError> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM players", PLAYER_COLUMNS));
        push_filter(&mut builder, filter);

        push_order(&mut builder, order);
        builder.push(" LIMIT ");
        builder.push_bind(page.limit() as i64);
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(player_from_row).collect()
    }

    async fn count(&self, filter: &PlayerFilter) -> Result<i64, DbError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM players");
        push_filter(&mut builder, filter);

        let (count,): (i64,) = builder.build_query_as().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get(&self, id: i64) -> Result<Option<Player>, DbError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM players WHERE id = $1",
            PLAYER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(player_from_row).transpose()
    }

    async fn insert(&self, record: PlayerRecord) -> Result<Player, DbError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO players
                (name, title, race, profession, birthday, banned, experience, level, until_next_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PLAYER_COLUMNS
        ))
        .bind(&record.name)
        .bind(&record.title)
        .bind(record.race.as_str())
        .bind(record.profession.as_str())
        .bind(record.birthday)
        .bind(record.banned)
        .bind(record.experience)
        .bind(record.level)
        .bind(record.until_next_level)
        .fetch_one(&self.pool)
        .await?;

        player_from_row(&row)
    }

    async fn update(&self, player: &Player) -> Result<Option<Player>, DbError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE players SET
                name = $2,
                title = $3,
                race = $4,
                profession = $5,
                birthday = $6,
                banned = $7,
                experience = $8,
                level = $9,
                until_next_level = $10
            WHERE id = $1
            RETURNING {}
            "#,
            PLAYER_COLUMNS
        ))
        .bind(player.id)
        .bind(&player.name)
        .bind(&player.title)
        .bind(player.race.as_str())
        .bind(player.profession.as_str())
        .bind(player.birthday)
        .bind(player.banned)
        .bind(player.experience)
        .bind(player.level)
        .bind(player.until_next_level)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(player_from_row).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
