//! User account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: UserId,
    pub username: String,

    /// bcrypt hash; never leaves the server
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub full_name: Option<String>,
    pub email: String,
    pub profile_picture_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Public profile returned by connection search.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub user_id: UserId,
    pub username: String,
    pub full_name: Option<String>,
    pub email: String,
    pub profile_picture_url: Option<String>,
}

/// Fields required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub email: String,
}
