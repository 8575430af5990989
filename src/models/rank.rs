//! Dated rank observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{GameId, RankId, UserId};

/// One user's rank on one game for one calendar day.
///
/// Exactly one of `numeric_rank` / `text_rank` is set, matching the
/// game's [`RankFormat`](super::RankFormat). Records are never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RankRecord {
    pub rank_id: RankId,
    pub user_id: UserId,
    pub game_id: GameId,
    pub text_rank: Option<String>,
    pub numeric_rank: Option<i64>,
    pub rank_date: NaiveDate,
}

impl RankRecord {
    /// A numerically ranked record.
    pub fn numeric(user_id: UserId, game_id: GameId, rank_date: NaiveDate, value: i64) -> Self {
        Self {
            rank_id: 0,
            user_id,
            game_id,
            text_rank: None,
            numeric_rank: Some(value),
            rank_date,
        }
    }

    /// A tier ranked record.
    pub fn text(user_id: UserId, game_id: GameId, rank_date: NaiveDate, label: &str) -> Self {
        Self {
            rank_id: 0,
            user_id,
            game_id,
            text_rank: Some(label.to_string()),
            numeric_rank: None,
            rank_date,
        }
    }
}

/// Request body for recording today's rank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankSubmission {
    pub text_rank: Option<String>,
    pub numeric_rank: Option<i64>,
}

/// Inclusive date window for rank queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    /// `false` when `since` is after `until`.
    pub fn is_valid(&self) -> bool {
        match (self.since, self.until) {
            (Some(since), Some(until)) => since <= until,
            _ => true,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since.map_or(true, |since| date >= since)
            && self.until.map_or(true, |until| date <= until)
    }
}
