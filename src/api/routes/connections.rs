use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{ActivityType, Connection, ConnectionRequest, RequestId, RequestStatus, UserId};

pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConnectionRequest>>, ApiError> {
    Ok(Json(state.db.list_connection_requests().await?))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<RequestId>,
) -> Result<Json<ConnectionRequest>, ApiError> {
    state
        .db
        .get_connection_request(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Connection request not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub sender_id: UserId,
    pub receiver_id: UserId,
}

pub async fn create_request(
    State(state): State<AppState>,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<ConnectionRequest>), ApiError> {
    let CreateRequestBody {
        sender_id,
        receiver_id,
    } = body;

    if sender_id == receiver_id {
        return Err(ApiError::BadRequest(
            "Cannot send a connection request to yourself".to_string(),
        ));
    }
    if !state.db.user_exists(sender_id).await? || !state.db.user_exists(receiver_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    if state.db.are_connected(sender_id, receiver_id).await? {
        return Err(ApiError::BadRequest("Users are already connected".to_string()));
    }
    if state.db.pending_request_between(sender_id, receiver_id).await? {
        return Err(ApiError::BadRequest(
            "A connection request is already pending".to_string(),
        ));
    }

    let request = state
        .db
        .create_connection_request(sender_id, receiver_id)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn accept_request(
    State(state): State<AppState>,
    Path(id): Path<RequestId>,
) -> Result<Json<Connection>, ApiError> {
    let request = state
        .db
        .get_connection_request(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Connection request not found".to_string()))?;

    if request.status != RequestStatus::Pending {
        return Err(ApiError::BadRequest(
            "Connection request is not pending".to_string(),
        ));
    }

    let connection = state.db.accept_connection_request(&request).await?;

    for (user, other) in [
        (request.sender_id, request.receiver_id),
        (request.receiver_id, request.sender_id),
    ] {
        state
            .db
            .log_activity(
                user,
                ActivityType::ConnectionAdded,
                Some(format!("user {}", other)),
            )
            .await?;
    }

    Ok(Json(connection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::test_util::*;
    use crate::storage::test_support::*;

    #[tokio::test]
    async fn test_request_and_accept() {
        let state = setup_test_state().await;
        let a = seed_user(&state.db, "alice").await;
        let b = seed_user(&state.db, "bob").await;
        let db = state.db.clone();
        let app = build_router(state);

        let body = format!(r#"{{"sender_id":{},"receiver_id":{}}}"#, a.user_id, b.user_id);
        let (status, json) = post_json(app.clone(), "/connections", &body).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["status"], "pending");
        let request_id = json["request_id"].as_i64().unwrap();

        let (status, json) = post_json(app.clone(), "/connections", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "A connection request is already pending");

        let (status, json) = get_json(app.clone(), &format!("/connections/{}", request_id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["sender_id"], a.user_id);

        let accept_uri = format!("/connections/{}/accept", request_id);
        let (status, json) = post_json(app.clone(), &accept_uri, "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user1_id"], a.user_id);
        assert!(db.are_connected(a.user_id, b.user_id).await.unwrap());

        let (status, _) = post_json(app.clone(), &accept_uri, "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = post_json(app.clone(), "/connections", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Users are already connected");

        let log = db.activity_for_user(b.user_id, 10, 0).await.unwrap();
        assert_eq!(log[0].activity_type, "connection_added");

        let (status, json) = get_json(app, "/connections").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_request_validation() {
        let state = setup_test_state().await;
        let a = seed_user(&state.db, "alice").await;
        let app = build_router(state);

        let body = format!(r#"{{"sender_id":{},"receiver_id":{}}}"#, a.user_id, a.user_id);
        let (status, _) = post_json(app.clone(), "/connections", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = format!(r#"{{"sender_id":{},"receiver_id":999}}"#, a.user_id);
        let (status, _) = post_json(app.clone(), "/connections", &body).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(app.clone(), "/connections/5").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = post_json(app, "/connections/5/accept", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
