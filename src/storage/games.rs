//! Games and their rank catalogs.

use async_trait::async_trait;
use sqlx::types::Json;

use super::{Database, StorageError};
use crate::calculate::RankCatalog;
use crate::models::{Game, GameId, NewGame};

impl Database {
    pub async fn list_games(&self) -> Result<Vec<Game>, StorageError> {
        let games = sqlx::query_as::<_, Game>("SELECT * FROM games ORDER BY game_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(games)
    }

    pub async fn get_game(&self, game_id: GameId) -> Result<Option<Game>, StorageError> {
        let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE game_id = ?")
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(game)
    }

    pub async fn game_name_exists(&self, game_name: &str) -> Result<bool, StorageError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM games WHERE game_name = ?)")
                .bind(game_name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create_game(&self, game: &NewGame) -> Result<Game, StorageError> {
        let created = sqlx::query_as::<_, Game>(
            "INSERT INTO games (game_name, rank_format, rank_range_low, rank_range_high, rank_types)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&game.game_name)
        .bind(game.rank_format)
        .bind(game.rank_range_low)
        .bind(game.rank_range_high)
        .bind(game.rank_types.clone().map(Json))
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(game_id = created.game_id, name = %created.game_name, "Created game");
        Ok(created)
    }
}

#[async_trait]
impl RankCatalog for Database {
    type Error = StorageError;

    async fn rank_catalog(&self, game_id: GameId) -> Result<Option<Vec<String>>, StorageError> {
        let types: Option<Option<Json<Vec<String>>>> =
            sqlx::query_scalar("SELECT rank_types FROM games WHERE game_id = ?")
                .bind(game_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(types.flatten().map(|json| json.0))
    }
}

#[cfg(test)]
mod tests {
    use crate::calculate::RankCatalog;
    use crate::models::RankFormat;
    use crate::storage::test_support::*;
    use crate::storage::Database;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_create_text_game_round_trips_catalog() {
        let db = Database::in_memory().await.unwrap();
        let game = seed_text_game(&db, "Valorant", &["Iron", "Bronze", "Silver"]).await;

        assert_eq!(game.rank_format, RankFormat::Text);
        assert_eq!(
            game.rank_catalog().unwrap(),
            &["Iron".to_string(), "Bronze".to_string(), "Silver".to_string()]
        );

        let catalog = db.rank_catalog(game.game_id).await.unwrap();
        assert_eq!(
            catalog,
            Some(vec!["Iron".to_string(), "Bronze".to_string(), "Silver".to_string()])
        );
    }

    #[tokio::test]
    async fn test_numeric_game_has_no_catalog() {
        let db = Database::in_memory().await.unwrap();
        let game = seed_numeric_game(&db, "Chess", Some(100), Some(3000)).await;

        assert_eq!(game.rank_range_low, Some(100));
        assert!(db.rank_catalog(game.game_id).await.unwrap().is_none());
        assert!(db.rank_catalog(4242).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_and_lookup_games() {
        let db = Database::in_memory().await.unwrap();
        seed_numeric_game(&db, "Chess", None, None).await;
        seed_text_game(&db, "League", &["Gold", "Platinum"]).await;

        let games = db.list_games().await.unwrap();
        assert_eq!(games.len(), 2);
        assert!(db.game_name_exists("League").await.unwrap());
        assert!(!db.game_name_exists("Dota").await.unwrap());
        assert_eq!(db.get_game(games[0].game_id).await.unwrap().unwrap().game_name, "Chess");
    }
}
