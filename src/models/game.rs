//! Game model and rank format.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::GameId;

/// How a game expresses skill ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RankFormat {
    /// Ranks are numbers, optionally bounded by `rank_range_low..=rank_range_high`.
    Numeric,
    /// Ranks are named tiers drawn from `rank_types`.
    Text,
}

/// A game users can record ranks for.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Game {
    pub game_id: GameId,
    pub game_name: String,
    pub rank_format: RankFormat,
    pub rank_range_low: Option<i64>,
    pub rank_range_high: Option<i64>,

    /// Ordered tier labels, lowest first. `None` for numeric games.
    pub rank_types: Option<Json<Vec<String>>>,
}

impl Game {
    /// The ordered tier catalog, if this game uses text ranks.
    pub fn rank_catalog(&self) -> Option<&[String]> {
        self.rank_types.as_ref().map(|types| types.0.as_slice())
    }

    /// Whether `value` falls inside the configured numeric bounds.
    /// Missing bounds are open.
    pub fn accepts_numeric_rank(&self, value: i64) -> bool {
        self.rank_range_low.map_or(true, |low| value >= low)
            && self.rank_range_high.map_or(true, |high| value <= high)
    }

    /// Whether `label` is one of the game's tiers.
    pub fn accepts_text_rank(&self, label: &str) -> bool {
        self.rank_catalog()
            .is_some_and(|catalog| catalog.iter().any(|tier| tier == label))
    }
}

/// Fields required to create a game.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGame {
    pub game_name: String,
    pub rank_format: RankFormat,
    pub rank_range_low: Option<i64>,
    pub rank_range_high: Option<i64>,
    pub rank_types: Option<Vec<String>>,
}

impl NewGame {
    /// Check that the rank configuration agrees with the rank format.
    pub fn validate(&self) -> Result<(), String> {
        let has_range = self.rank_range_low.is_some() || self.rank_range_high.is_some();

        if self.game_name.trim().is_empty() {
            return Err("game_name must not be empty".to_string());
        }

        if has_range && self.rank_types.is_some() {
            return Err("Either rank_range or rank_types should be defined, not both".to_string());
        }

        match self.rank_format {
            RankFormat::Text => match &self.rank_types {
                Some(types) if !types.is_empty() => {
                    let mut seen = std::collections::HashSet::new();
                    if let Some(dup) = types.iter().find(|t| !seen.insert(t.as_str())) {
                        return Err(format!("Duplicate rank type: {}", dup));
                    }
                }
                _ => return Err("Text rank format requires a non-empty rank_types list".to_string()),
            },
            RankFormat::Numeric => {
                if self.rank_types.is_some() {
                    return Err("Numeric rank format does not take rank_types".to_string());
                }
                if let (Some(low), Some(high)) = (self.rank_range_low, self.rank_range_high) {
                    if low > high {
                        return Err("rank_range_low must not exceed rank_range_high".to_string());
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiered(types: &[&str]) -> NewGame {
        NewGame {
            game_name: "Valorant".to_string(),
            rank_format: RankFormat::Text,
            rank_range_low: None,
            rank_range_high: None,
            rank_types: Some(types.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn numeric(low: Option<i64>, high: Option<i64>) -> NewGame {
        NewGame {
            game_name: "Chess".to_string(),
            rank_format: RankFormat::Numeric,
            rank_range_low: low,
            rank_range_high: high,
            rank_types: None,
        }
    }

    #[test]
    fn test_rank_format_serialization() {
        assert_eq!(serde_json::to_string(&RankFormat::Numeric).unwrap(), "\"numeric\"");
        assert_eq!(serde_json::to_string(&RankFormat::Text).unwrap(), "\"text\"");
    }

    #[test]
    fn test_validate_tiered_game() {
        assert!(tiered(&["Bronze", "Silver", "Gold"]).validate().is_ok());
        assert!(tiered(&[]).validate().is_err());
        assert!(tiered(&["Gold", "Gold"]).validate().is_err());
    }

    #[test]
    fn test_validate_range_and_types_conflict() {
        let mut game = tiered(&["Bronze"]);
        game.rank_range_high = Some(10);
        let err = game.validate().unwrap_err();
        assert!(err.contains("not both"));
    }

    #[test]
    fn test_validate_numeric_game() {
        assert!(numeric(Some(0), Some(3000)).validate().is_ok());
        assert!(numeric(None, None).validate().is_ok());
        assert!(numeric(Some(10), Some(1)).validate().is_err());

        let mut game = numeric(None, None);
        game.rank_types = Some(vec!["Bronze".to_string()]);
        assert!(game.validate().is_err());
    }

    #[test]
    fn test_accepts_ranks() {
        let game = Game {
            game_id: 1,
            game_name: "Chess".to_string(),
            rank_format: RankFormat::Numeric,
            rank_range_low: Some(100),
            rank_range_high: None,
            rank_types: None,
        };
        assert!(game.accepts_numeric_rank(100));
        assert!(game.accepts_numeric_rank(2800));
        assert!(!game.accepts_numeric_rank(99));
        assert!(!game.accepts_text_rank("Gold"));
        assert!(game.rank_catalog().is_none());
    }
}
