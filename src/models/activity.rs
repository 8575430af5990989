//! User activity log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{LogId, UserId};

/// Kinds of activity written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Signup,
    RankSubmitted,
    ConnectionAdded,
    ConnectionRemoved,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Signup => "signup",
            ActivityType::RankSubmitted => "rank_submitted",
            ActivityType::ConnectionAdded => "connection_added",
            ActivityType::ConnectionRemoved => "connection_removed",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One activity log entry.
///
/// `activity_type` stays a string on read so rows written by other tools
/// still load.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityEntry {
    pub log_id: LogId,
    pub user_id: UserId,
    pub activity_type: String,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_matches_serde_name() {
        for kind in [
            ActivityType::Signup,
            ActivityType::RankSubmitted,
            ActivityType::ConnectionAdded,
            ActivityType::ConnectionRemoved,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
