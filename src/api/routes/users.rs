use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{
    ActivityType, GameId, NewUser, RankFormat, RankRecord, RankSubmission, User, UserId,
    UserSummary,
};

/// Most results returned by a connection search.
const SEARCH_LIMIT: u32 = 10;

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.db.list_users().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
    state
        .db
        .get_user(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

fn non_empty(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ApiError::BadRequest(format!("{} is required", field))),
    }
}

async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ApiError::Internal("Internal Server Error".to_string())
        })
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let username = non_empty(body.username, "username")?;
    let email = non_empty(body.email, "email")?;
    let password = match body.password {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::BadRequest("password is required".to_string())),
    };
    let full_name = body.full_name.filter(|n| !n.trim().is_empty());

    let in_use = || ApiError::BadRequest("Username or email already in use".to_string());

    if state.db.username_or_email_taken(&username, &email).await? {
        return Err(in_use());
    }

    let password_hash = hash_password(password, state.bcrypt_cost).await?;

    let user = state
        .db
        .create_user(&NewUser {
            username,
            password_hash,
            full_name,
            email,
        })
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                in_use()
            } else {
                e.into()
            }
        })?;

    state
        .db
        .log_activity(user.user_id, ActivityType::Signup, None)
        .await?;

    tracing::info!(user_id = user.user_id, username = %user.username, "User signed up");
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_query: Option<String>,
}

pub async fn search_connections(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    if !state.db.user_exists(id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let query = params.search_query.unwrap_or_default();
    let users = state
        .db
        .search_potential_connections(id, query.trim(), SEARCH_LIMIT)
        .await?;
    Ok(Json(users))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn remove_connection(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(UserId, UserId)>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.db.user_exists(id).await? || !state.db.user_exists(friend_id).await? {
        return Err(ApiError::NotFound("User or friend not found".to_string()));
    }

    if !state.db.remove_connection(id, friend_id).await? {
        return Err(ApiError::BadRequest("Users are not friends".to_string()));
    }

    for (user, other) in [(id, friend_id), (friend_id, id)] {
        state
            .db
            .log_activity(
                user,
                ActivityType::ConnectionRemoved,
                Some(format!("user {}", other)),
            )
            .await?;
    }

    Ok(Json(MessageResponse {
        message: "Friend removed successfully".to_string(),
    }))
}

/// Check a submission against the game's rank format and return the
/// normalized `(text_rank, numeric_rank)` pair.
fn validate_submission(
    game: &crate::models::Game,
    submission: RankSubmission,
) -> Result<(Option<String>, Option<i64>), ApiError> {
    let text = submission.text_rank.filter(|t| !t.trim().is_empty());

    match (game.rank_format, text, submission.numeric_rank) {
        (RankFormat::Numeric, None, Some(value)) => {
            if !game.accepts_numeric_rank(value) {
                return Err(ApiError::BadRequest(format!(
                    "numeric_rank {} is outside the range of {}",
                    value, game.game_name
                )));
            }
            Ok((None, Some(value)))
        }
        (RankFormat::Text, Some(label), None) => {
            if !game.accepts_text_rank(&label) {
                return Err(ApiError::BadRequest(format!(
                    "'{}' is not a rank of {}",
                    label, game.game_name
                )));
            }
            Ok((Some(label), None))
        }
        (RankFormat::Numeric, _, _) => Err(ApiError::BadRequest(
            "This game takes a numeric_rank only".to_string(),
        )),
        (RankFormat::Text, _, _) => Err(ApiError::BadRequest(
            "This game takes a text_rank only".to_string(),
        )),
    }
}

pub async fn submit_rank(
    State(state): State<AppState>,
    Path((id, game_id)): Path<(UserId, GameId)>,
    Json(submission): Json<RankSubmission>,
) -> Result<(StatusCode, Json<RankRecord>), ApiError> {
    if !state.db.user_exists(id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    let game = state
        .db
        .get_game(game_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))?;

    let today = Utc::now().date_naive();
    let already = || {
        ApiError::BadRequest(
            "User already has a rank for today and the specified game".to_string(),
        )
    };

    if state.db.rank_exists_on(id, game_id, today).await? {
        return Err(already());
    }

    let (text_rank, numeric_rank) = validate_submission(&game, submission)?;

    let record = state
        .db
        .insert_rank(id, game_id, text_rank.as_deref(), numeric_rank, today)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                already()
            } else {
                e.into()
            }
        })?;

    let shown = match (&record.text_rank, record.numeric_rank) {
        (Some(label), _) => label.clone(),
        (None, Some(value)) => value.to_string(),
        (None, None) => String::new(),
    };
    state
        .db
        .log_activity(
            id,
            ActivityType::RankSubmitted,
            Some(format!("{}: {}", game.game_name, shown)),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}
