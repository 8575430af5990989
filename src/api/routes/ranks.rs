use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{required, ApiError, PageParams, Pagination};
use crate::calculate::{RankAggregator, RankMode, RankValue};
use crate::models::{DateRange, GameId, RankRecord, UserId};

pub async fn list_ranks(State(state): State<AppState>) -> Result<Json<Vec<RankRecord>>, ApiError> {
    Ok(Json(state.db.list_ranks().await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGameParams {
    pub user_id: Option<UserId>,
    pub game_id: Option<GameId>,
}

pub async fn user_game_ranks(
    State(state): State<AppState>,
    Query(params): Query<UserGameParams>,
) -> Result<Json<Vec<RankRecord>>, ApiError> {
    let user_id = required(params.user_id, "userId")?;
    let game_id = required(params.game_id, "gameId")?;
    let ranks = state
        .db
        .ranks_for_user_game(user_id, game_id, DateRange::default())
        .await?;
    Ok(Json(ranks))
}

pub async fn user_ranks(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<RankRecord>>, ApiError> {
    let pagination = params.pagination()?;
    let ranks = state
        .db
        .ranks_for_user(user_id, pagination.page_size, pagination.offset())
        .await?;
    Ok(Json(ranks))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageParams {
    pub user_id: Option<UserId>,
    pub game_id: Option<GameId>,
    pub since: Option<String>,
    pub until: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AverageRankResponse {
    pub user_id: UserId,
    pub game_id: GameId,
    pub mode: RankMode,
    pub average: RankValue,
    pub record_count: usize,
}

fn parse_date(raw: Option<&str>, name: &str) -> Result<Option<NaiveDate>, ApiError> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            ApiError::BadRequest(format!("Invalid {} date (expected YYYY-MM-DD): {}", name, s))
        })
    })
    .transpose()
}

pub async fn average_rank(
    State(state): State<AppState>,
    Query(params): Query<AverageParams>,
) -> Result<Json<AverageRankResponse>, ApiError> {
    let user_id = required(params.user_id, "userId")?;
    let game_id = required(params.game_id, "gameId")?;
    let range = DateRange::new(
        parse_date(params.since.as_deref(), "since")?,
        parse_date(params.until.as_deref(), "until")?,
    );
    if !range.is_valid() {
        return Err(ApiError::BadRequest(
            "since must not be after until".to_string(),
        ));
    }

    let records = state.db.ranks_for_user_game(user_id, game_id, range).await?;
    let average = RankAggregator::new(state.db.clone())
        .compute_average(&records)
        .await?;

    Ok(Json(AverageRankResponse {
        user_id,
        game_id,
        mode: average.mode(),
        average,
        record_count: records.len(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParams {
    pub user_id: Option<UserId>,
    pub game_id: Option<GameId>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

pub async fn network_ranks(
    State(state): State<AppState>,
    Query(params): Query<NetworkParams>,
) -> Result<Json<Vec<RankRecord>>, ApiError> {
    let pagination = Pagination::parse(params.page.as_deref(), params.page_size.as_deref())?;
    let user_id = required(params.user_id, "userId")?;
    let game_id = required(params.game_id, "gameId")?;

    let ranks = state
        .db
        .ranks_for_network(user_id, game_id, pagination.page_size, pagination.offset())
        .await?;
    Ok(Json(ranks))
}
