//! REST API endpoints.
//!
//! Axum-based HTTP API over users, games, connections, the activity log
//! and rank history.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::AggregateError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!("Storage error: {}", err);
        ApiError::Internal("Internal Server Error".to_string())
    }
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::EmptyInput => ApiError::NotFound("No ranks recorded".to_string()),
            other => {
                tracing::error!("Rank aggregation failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl Pagination {
    /// Parse raw query values. Missing values take the defaults; anything
    /// that is not a positive integer is rejected. Page size is capped at
    /// [`MAX_PAGE_SIZE`].
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Result<Self, ApiError> {
        let defaults = Self::default();
        let page = parse_positive(page, defaults.page)?;
        let page_size = parse_positive(page_size, defaults.page_size)?.min(MAX_PAGE_SIZE);
        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

fn parse_positive(raw: Option<&str>, default: u32) -> Result<u32, ApiError> {
    match raw {
        None => Ok(default),
        Some(s) => match s.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ApiError::BadRequest(
                "Invalid page or pageSize parameters".to_string(),
            )),
        },
    }
}

/// `page` / `pageSize` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageParams {
    pub fn pagination(&self) -> Result<Pagination, ApiError> {
        Pagination::parse(self.page.as_deref(), self.page_size.as_deref())
    }
}

/// Unwrap a required query parameter.
pub fn required<T>(value: Option<T>, name: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Missing required parameter: {}", name)))
}

async fn root() -> &'static str {
    "API is responding."
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    use routes::{activity, connections, games, ranks, users};

    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/", get(root))
        .route("/users", get(users::list_users))
        .route("/users/signup", post(users::signup))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id/connections", get(users::search_connections))
        .route(
            "/users/:id/connections/:friend_id",
            delete(users::remove_connection),
        )
        .route("/users/:id/games/:game_id", post(users::submit_rank))
        .route("/games", get(games::list_games).post(games::create_game))
        .route("/games/:id", get(games::get_game))
        .route(
            "/connections",
            get(connections::list_requests).post(connections::create_request),
        )
        .route("/connections/:id", get(connections::get_request))
        .route("/connections/:id/accept", post(connections::accept_request))
        .route("/activity", get(activity::list_activity))
        .route("/activity/:id", get(activity::get_activity))
        .route("/activity/user/:user_id", get(activity::user_activity))
        .route("/ranks", get(ranks::list_ranks))
        .route("/ranks/user", get(ranks::user_game_ranks))
        .route("/ranks/user/:user_id", get(ranks::user_ranks))
        .route("/ranks/average", get(ranks::average_rank))
        .route("/ranks/connections", get(ranks::network_ranks))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_util {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::state::AppState;
    use crate::storage::Database;

    pub async fn setup_test_state() -> AppState {
        let db = Database::in_memory().await.unwrap();
        AppState::new(db, 4, "*")
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
        send(
            app,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(
            app,
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}
