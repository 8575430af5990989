//! Connection requests and established connections.
//!
//! Links are undirected; they are stored with the smaller user ID in
//! `user1_id` so each pair appears once.

use chrono::Utc;

use super::{Database, StorageError};
use crate::models::{Connection, ConnectionRequest, RequestId, RequestStatus, UserId};

fn ordered(a: UserId, b: UserId) -> (UserId, UserId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Database {
    pub async fn list_connection_requests(&self) -> Result<Vec<ConnectionRequest>, StorageError> {
        let requests = sqlx::query_as::<_, ConnectionRequest>(
            "SELECT * FROM connection_requests ORDER BY request_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn get_connection_request(
        &self,
        request_id: RequestId,
    ) -> Result<Option<ConnectionRequest>, StorageError> {
        let request = sqlx::query_as::<_, ConnectionRequest>(
            "SELECT * FROM connection_requests WHERE request_id = ?",
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    /// Whether a pending request exists between the two users, in either
    /// direction.
    pub async fn pending_request_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<bool, StorageError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
               SELECT 1 FROM connection_requests
               WHERE status = 'pending'
                 AND ((sender_id = ?1 AND receiver_id = ?2) OR (sender_id = ?2 AND receiver_id = ?1))
             )",
        )
        .bind(a)
        .bind(b)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create_connection_request(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
    ) -> Result<ConnectionRequest, StorageError> {
        let request = sqlx::query_as::<_, ConnectionRequest>(
            "INSERT INTO connection_requests (sender_id, receiver_id, status, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING *",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(RequestStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    /// Mark a request accepted and create the link, atomically.
    pub async fn accept_connection_request(
        &self,
        request: &ConnectionRequest,
    ) -> Result<Connection, StorageError> {
        let (user1, user2) = ordered(request.sender_id, request.receiver_id);
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE connection_requests SET status = ? WHERE request_id = ?")
            .bind(RequestStatus::Accepted)
            .bind(request.request_id)
            .execute(&mut *tx)
            .await?;

        let connection = sqlx::query_as::<_, Connection>(
            "INSERT INTO user_connections (user1_id, user2_id, created_at)
             VALUES (?, ?, ?)
             RETURNING *",
        )
        .bind(user1)
        .bind(user2)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            request_id = request.request_id,
            connection_id = connection.connection_id,
            "Accepted connection request"
        );
        Ok(connection)
    }

    pub async fn are_connected(&self, a: UserId, b: UserId) -> Result<bool, StorageError> {
        let (user1, user2) = ordered(a, b);
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_connections WHERE user1_id = ? AND user2_id = ?)",
        )
        .bind(user1)
        .bind(user2)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Remove the link between two users. Returns `false` if there was none.
    pub async fn remove_connection(&self, a: UserId, b: UserId) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "DELETE FROM user_connections
             WHERE (user1_id = ?1 AND user2_id = ?2) OR (user1_id = ?2 AND user2_id = ?1)",
        )
        .bind(a)
        .bind(b)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
