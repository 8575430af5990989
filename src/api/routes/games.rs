use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Game, GameId, NewGame};

pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, ApiError> {
    Ok(Json(state.db.list_games().await?))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<Game>, ApiError> {
    state
        .db
        .get_game(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))
}

pub async fn create_game(
    State(state): State<AppState>,
    Json(mut body): Json<NewGame>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    body.game_name = body.game_name.trim().to_string();
    body.validate().map_err(ApiError::BadRequest)?;

    let exists = || ApiError::BadRequest("Game already exists".to_string());

    if state.db.game_name_exists(&body.game_name).await? {
        return Err(exists());
    }

    let game = state.db.create_game(&body).await.map_err(|e| {
        if e.is_unique_violation() {
            exists()
        } else {
            e.into()
        }
    })?;

    tracing::info!(game_id = game.game_id, name = %game.game_name, "Game created");
    Ok((StatusCode::CREATED, Json(game)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::test_util::*;
    use crate::storage::test_support::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_text_game() {
        let app = build_router(setup_test_state().await);

        let (status, body) = post_json(
            app.clone(),
            "/games",
            r#"{"game_name":"Valorant","rank_format":"text","rank_types":["Iron","Bronze","Silver"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["rank_format"], "text");
        assert_eq!(body["rank_types"], json!(["Iron", "Bronze", "Silver"]));
        assert!(body["rank_range_low"].is_null());

        let (status, body) = get_json(app, &format!("/games/{}", body["game_id"])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["game_name"], "Valorant");
    }

    #[tokio::test]
    async fn test_create_game_rejects_range_and_types() {
        let app = build_router(setup_test_state().await);

        let (status, body) = post_json(
            app,
            "/games",
            r#"{"game_name":"Odd","rank_format":"text","rank_range_low":1,"rank_types":["A"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Either rank_range or rank_types should be defined, not both"
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_game() {
        let state = setup_test_state().await;
        seed_numeric_game(&state.db, "Chess", Some(0), Some(3000)).await;
        let app = build_router(state);

        let (status, body) = post_json(
            app,
            "/games",
            r#"{"game_name":"Chess","rank_format":"numeric"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Game already exists");
    }

    #[tokio::test]
    async fn test_list_and_missing_games() {
        let state = setup_test_state().await;
        seed_numeric_game(&state.db, "Chess", None, None).await;
        seed_text_game(&state.db, "League", &["Gold"]).await;
        let app = build_router(state);

        let (status, body) = get_json(app.clone(), "/games").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, _) = get_json(app, "/games/77").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
