//! Daily rank history. Rows are only ever inserted.

use chrono::NaiveDate;

use super::{Database, StorageError};
use crate::models::{DateRange, GameId, RankRecord, UserId};

impl Database {
    pub async fn list_ranks(&self) -> Result<Vec<RankRecord>, StorageError> {
        let ranks = sqlx::query_as::<_, RankRecord>("SELECT * FROM user_ranks ORDER BY rank_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(ranks)
    }

    /// All of one user's records on one game inside `range`, oldest first.
    pub async fn ranks_for_user_game(
        &self,
        user_id: UserId,
        game_id: GameId,
        range: DateRange,
    ) -> Result<Vec<RankRecord>, StorageError> {
        let ranks = sqlx::query_as::<_, RankRecord>(
            "SELECT * FROM user_ranks
             WHERE user_id = ?1 AND game_id = ?2
               AND (?3 IS NULL OR rank_date >= ?3)
               AND (?4 IS NULL OR rank_date <= ?4)
             ORDER BY rank_date, rank_id",
        )
        .bind(user_id)
        .bind(game_id)
        .bind(range.since)
        .bind(range.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(ranks)
    }

    /// One page of a user's records across all games, newest first.
    pub async fn ranks_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RankRecord>, StorageError> {
        let ranks = sqlx::query_as::<_, RankRecord>(
            "SELECT * FROM user_ranks
             WHERE user_id = ?
             ORDER BY rank_date DESC, rank_id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;
        Ok(ranks)
    }

    /// One page of records on `game_id` for the user and everyone they are
    /// connected to, newest first.
    pub async fn ranks_for_network(
        &self,
        user_id: UserId,
        game_id: GameId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RankRecord>, StorageError> {
        let ranks = sqlx::query_as::<_, RankRecord>(
            "SELECT * FROM user_ranks
             WHERE game_id = ?1
               AND (user_id = ?2 OR user_id IN (
                 SELECT user2_id FROM user_connections WHERE user1_id = ?2
                 UNION
                 SELECT user1_id FROM user_connections WHERE user2_id = ?2
               ))
             ORDER BY rank_date DESC, rank_id DESC
             LIMIT ?3 OFFSET ?4",
        )
        .bind(game_id)
        .bind(user_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;
        Ok(ranks)
    }

    pub async fn rank_exists_on(
        &self,
        user_id: UserId,
        game_id: GameId,
        rank_date: NaiveDate,
    ) -> Result<bool, StorageError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
               SELECT 1 FROM user_ranks WHERE user_id = ? AND game_id = ? AND rank_date = ?
             )",
        )
        .bind(user_id)
        .bind(game_id)
        .bind(rank_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn insert_rank(
        &self,
        user_id: UserId,
        game_id: GameId,
        text_rank: Option<&str>,
        numeric_rank: Option<i64>,
        rank_date: NaiveDate,
    ) -> Result<RankRecord, StorageError> {
        let record = sqlx::query_as::<_, RankRecord>(
            "INSERT INTO user_ranks (user_id, game_id, text_rank, numeric_rank, rank_date)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(user_id)
        .bind(game_id)
        .bind(text_rank)
        .bind(numeric_rank)
        .bind(rank_date)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            rank_id = record.rank_id,
            user_id,
            game_id,
            %rank_date,
            "Recorded rank"
        );
        Ok(record)
    }
}
