//! Connection requests and established user connections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ConnectionId, RequestId, UserId};

/// Lifecycle of a connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
}

/// A request from one user to connect with another.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConnectionRequest {
    pub request_id: RequestId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// An established, undirected link between two users.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Connection {
    pub connection_id: ConnectionId,
    pub user1_id: UserId,
    pub user2_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    /// The other side of the link, if `user_id` is part of it.
    pub fn other(&self, user_id: UserId) -> Option<UserId> {
        if self.user1_id == user_id {
            Some(self.user2_id)
        } else if self.user2_id == user_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_other() {
        let conn = Connection {
            connection_id: 1,
            user1_id: 10,
            user2_id: 20,
            created_at: Utc::now(),
        };
        assert_eq!(conn.other(10), Some(20));
        assert_eq!(conn.other(20), Some(10));
        assert_eq!(conn.other(30), None);
    }

    #[test]
    fn test_request_status_serialization() {
        assert_eq!(serde_json::to_string(&RequestStatus::Pending).unwrap(), "\"pending\"");
        let parsed: RequestStatus = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(parsed, RequestStatus::Accepted);
    }
}
