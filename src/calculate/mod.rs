//! Rank aggregation.
//!
//! Reduces a user's dated rank records on one game to a single
//! representative value. Games rank either numerically (mean of the
//! values) or with ordered named tiers (mean tier position, truncated,
//! mapped back to its label).

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::{GameId, RankRecord};

/// Errors raised while aggregating ranks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("No rank records to aggregate")]
    EmptyInput,

    #[error("Invalid rank data: {0}")]
    InvalidData(String),

    #[error("Rank '{rank}' is not in the rank catalog of game {game_id}")]
    RankNotFound { rank: String, game_id: GameId },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Source of the ordered tier labels for text-ranked games.
#[async_trait]
pub trait RankCatalog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Tier labels for `game_id`, lowest first. `None` when the game is
    /// unknown or numerically ranked.
    async fn rank_catalog(&self, game_id: GameId) -> Result<Option<Vec<String>>, Self::Error>;
}

/// Whether a record set is numeric or tiered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    Numeric,
    Text,
}

/// An aggregated rank. Serializes as a bare number or string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RankValue {
    Numeric(f64),
    Text(String),
}

impl RankValue {
    pub fn mode(&self) -> RankMode {
        match self {
            RankValue::Numeric(_) => RankMode::Numeric,
            RankValue::Text(_) => RankMode::Text,
        }
    }
}

/// Decide the mode from a representative record.
pub fn detect_mode(record: &RankRecord) -> RankMode {
    if record.numeric_rank.is_some() {
        RankMode::Numeric
    } else {
        RankMode::Text
    }
}

fn numeric_value(index: usize, record: &RankRecord) -> Result<i64, AggregateError> {
    match (record.numeric_rank, &record.text_rank) {
        (Some(value), None) => Ok(value),
        (Some(_), Some(_)) => Err(AggregateError::InvalidData(format!(
            "record {} carries both a numeric and a text rank",
            index
        ))),
        (None, _) => Err(AggregateError::InvalidData(format!(
            "record {} has no numeric rank in a numeric record set",
            index
        ))),
    }
}

fn text_value(index: usize, record: &RankRecord) -> Result<&str, AggregateError> {
    match (&record.text_rank, record.numeric_rank) {
        (Some(label), None) => Ok(label),
        (Some(_), Some(_)) => Err(AggregateError::InvalidData(format!(
            "record {} carries both a numeric and a text rank",
            index
        ))),
        (None, _) => Err(AggregateError::InvalidData(format!(
            "record {} has no text rank in a text record set",
            index
        ))),
    }
}

/// Arithmetic mean of the numeric ranks.
pub fn numeric_average(records: &[RankRecord]) -> Result<f64, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let sum = records
        .iter()
        .enumerate()
        .try_fold(0.0_f64, |acc, (i, record)| {
            numeric_value(i, record).map(|value| acc + value as f64)
        })?;

    Ok(sum / records.len() as f64)
}

/// Mean tier of the text ranks against `catalog` (lowest tier first).
///
/// The mean position is truncated towards zero before it is mapped back
/// to a label.
pub fn text_average(records: &[RankRecord], catalog: &[String]) -> Result<String, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let total = records
        .iter()
        .enumerate()
        .try_fold(0_usize, |acc, (i, record)| {
            let label = text_value(i, record)?;
            catalog
                .iter()
                .position(|tier| tier == label)
                .map(|position| acc + position)
                .ok_or_else(|| AggregateError::RankNotFound {
                    rank: label.to_string(),
                    game_id: record.game_id,
                })
        })?;

    let index = total / records.len();
    catalog.get(index).cloned().ok_or_else(|| {
        AggregateError::Internal(format!(
            "average tier index {} outside catalog of {} tiers",
            index,
            catalog.len()
        ))
    })
}

/// Computes average ranks, fetching tier catalogs on demand.
pub struct RankAggregator<C> {
    catalog: C,
}

impl<C: RankCatalog> RankAggregator<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Average of `records`, which must all belong to one user and one game.
    ///
    /// The mode is taken from the first record. Text mode reads the tier
    /// catalog of that record's game; numeric mode does no I/O.
    pub async fn compute_average(&self, records: &[RankRecord]) -> Result<RankValue, AggregateError> {
        let first = records.first().ok_or(AggregateError::EmptyInput)?;
        let mode = detect_mode(first);

        tracing::debug!(
            game_id = first.game_id,
            user_id = first.user_id,
            ?mode,
            count = records.len(),
            "Aggregating ranks"
        );

        match mode {
            RankMode::Numeric => numeric_average(records).map(RankValue::Numeric),
            RankMode::Text => {
                let catalog = self
                    .catalog
                    .rank_catalog(first.game_id)
                    .await
                    .map_err(|e| {
                        tracing::error!(game_id = first.game_id, "Rank catalog lookup failed: {}", e);
                        AggregateError::Internal(format!("rank catalog lookup failed: {}", e))
                    })?
                    .ok_or_else(|| {
                        AggregateError::Internal(format!(
                            "game {} has no rank catalog",
                            first.game_id
                        ))
                    })?;

                text_average(records, &catalog).map(RankValue::Text)
            }
        }
    }
}
