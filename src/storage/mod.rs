//! Relational storage.
//!
//! SQLite via sqlx. [`Database`] wraps the connection pool; each table
//! group adds its queries in its own submodule:
//! - `users`: accounts and connection search
//! - `games`: games and their tier catalogs
//! - `ranks`: append-only daily rank history
//! - `connections`: connection requests and established links
//! - `activity`: the user activity log

mod activity;
mod connections;
mod games;
mod ranks;
mod users;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    /// Whether the failure was a UNIQUE constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StorageError::Sqlx(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

/// Handle to the application database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool for the configured database URL.
    ///
    /// In-memory databases live only as long as their connection, so they
    /// get a single connection that is never recycled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if is_memory_url(&config.url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        tracing::info!(url = %config.url, "Connected to database");
        Ok(Self { pool })
    }

    /// A fresh, migrated in-memory database.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let db = Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Build a `LIKE` pattern matching `query` anywhere, with `\` as the
/// escape character for literal `%` and `_`.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Database;
    use crate::models::{Game, NewGame, NewUser, RankFormat, User, UserId};

    pub async fn seed_user(db: &Database, username: &str) -> User {
        db.create_user(&NewUser {
            username: username.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            full_name: Some(format!("{} Tester", username)),
            email: format!("{}@example.com", username),
        })
        .await
        .unwrap()
    }

    pub async fn seed_text_game(db: &Database, name: &str, tiers: &[&str]) -> Game {
        db.create_game(&NewGame {
            game_name: name.to_string(),
            rank_format: RankFormat::Text,
            rank_range_low: None,
            rank_range_high: None,
            rank_types: Some(tiers.iter().map(|t| t.to_string()).collect()),
        })
        .await
        .unwrap()
    }

    pub async fn seed_numeric_game(
        db: &Database,
        name: &str,
        low: Option<i64>,
        high: Option<i64>,
    ) -> Game {
        db.create_game(&NewGame {
            game_name: name.to_string(),
            rank_format: RankFormat::Numeric,
            rank_range_low: low,
            rank_range_high: high,
            rank_types: None,
        })
        .await
        .unwrap()
    }

    pub async fn connect_users(db: &Database, a: UserId, b: UserId) {
        let request = db.create_connection_request(a, b).await.unwrap();
        db.accept_connection_request(&request).await.unwrap();
    }
}
