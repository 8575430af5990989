use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::state::AppState;
use crate::api::{ApiError, PageParams};
use crate::models::{ActivityEntry, LogId, UserId};

pub async fn list_activity(
    State(state): State<AppState>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    Ok(Json(state.db.list_activity().await?))
}

pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<LogId>,
) -> Result<Json<ActivityEntry>, ApiError> {
    state
        .db
        .get_activity(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Activity log entry not found".to_string()))
}

pub async fn user_activity(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    let pagination = params.pagination()?;
    let entries = state
        .db
        .activity_for_user(user_id, pagination.page_size, pagination.offset())
        .await?;
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::test_util::*;
    use crate::models::ActivityType;
    use crate::storage::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_user_activity_pages() {
        let state = setup_test_state().await;
        let user = seed_user(&state.db, "oak").await;
        for _ in 0..3 {
            state
                .db
                .log_activity(user.user_id, ActivityType::RankSubmitted, None)
                .await
                .unwrap();
        }
        state
            .db
            .log_activity(user.user_id, ActivityType::Signup, None)
            .await
            .unwrap();
        let app = build_router(state);

        let uri = format!("/activity/user/{}?page=1&pageSize=2", user.user_id);
        let (status, json) = get_json(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["activity_type"], "signup");

        let uri = format!("/activity/user/{}?page=2&pageSize=3", user.user_id);
        let (_, json) = get_json(app.clone(), &uri).await;
        assert_eq!(json.as_array().unwrap().len(), 1);

        let uri = format!("/activity/user/{}?page=0", user.user_id);
        let (status, json) = get_json(app, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Invalid page or pageSize parameters");
    }

    #[tokio::test]
    async fn test_list_and_get_activity() {
        let state = setup_test_state().await;
        let user = seed_user(&state.db, "elm").await;
        let entry = state
            .db
            .log_activity(user.user_id, ActivityType::Signup, None)
            .await
            .unwrap();
        let app = build_router(state);

        let (status, json) = get_json(app.clone(), "/activity").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);

        let (status, json) = get_json(app.clone(), &format!("/activity/{}", entry.log_id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user_id"], user.user_id);

        let (status, _) = get_json(app, "/activity/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
