//! User accounts.

use chrono::Utc;

use super::{contains_pattern, Database, StorageError};
use crate::models::{NewUser, User, UserId, UserSummary};

impl Database {
    pub async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn user_exists(&self, user_id: UserId) -> Result<bool, StorageError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Whether either the username or the email is already registered.
    pub async fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, StorageError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? OR email = ?)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, StorageError> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, full_name, email, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user_id = created.user_id, "Created user");
        Ok(created)
    }

    /// Users other than `user_id`, not yet connected to them, whose
    /// username, full name or email contains `query` (case-insensitive).
    pub async fn search_potential_connections(
        &self,
        user_id: UserId,
        query: &str,
        limit: u32,
    ) -> Result<Vec<UserSummary>, StorageError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT user_id, username, full_name, email, profile_picture_url
            FROM users
            WHERE user_id != ?1
              AND (LOWER(username) LIKE LOWER(?2) ESCAPE '\'
                OR LOWER(COALESCE(full_name, '')) LIKE LOWER(?2) ESCAPE '\'
                OR LOWER(email) LIKE LOWER(?2) ESCAPE '\')
              AND user_id NOT IN (
                SELECT user1_id FROM user_connections WHERE user2_id = ?1
                UNION
                SELECT user2_id FROM user_connections WHERE user1_id = ?1
              )
            ORDER BY user_id
            LIMIT ?3
            "#,
        )
        .bind(user_id)
        .bind(contains_pattern(query))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
