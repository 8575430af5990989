//! User activity log.

use chrono::Utc;

use super::{Database, StorageError};
use crate::models::{ActivityEntry, ActivityType, LogId, UserId};

impl Database {
    pub async fn list_activity(&self) -> Result<Vec<ActivityEntry>, StorageError> {
        let entries =
            sqlx::query_as::<_, ActivityEntry>("SELECT * FROM user_activity_log ORDER BY log_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(entries)
    }

    pub async fn get_activity(&self, log_id: LogId) -> Result<Option<ActivityEntry>, StorageError> {
        let entry =
            sqlx::query_as::<_, ActivityEntry>("SELECT * FROM user_activity_log WHERE log_id = ?")
                .bind(log_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(entry)
    }

    /// One page of a user's activity, newest first.
    pub async fn activity_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ActivityEntry>, StorageError> {
        let entries = sqlx::query_as::<_, ActivityEntry>(
            "SELECT * FROM user_activity_log
             WHERE user_id = ?
             ORDER BY timestamp DESC, log_id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn log_activity(
        &self,
        user_id: UserId,
        activity: ActivityType,
        details: Option<String>,
    ) -> Result<ActivityEntry, StorageError> {
        let entry = sqlx::query_as::<_, ActivityEntry>(
            "INSERT INTO user_activity_log (user_id, activity_type, details, timestamp)
             VALUES (?, ?, ?, ?)
             RETURNING *",
        )
        .bind(user_id)
        .bind(activity.as_str())
        .bind(details)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }
}
