//! User endpoints.

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::AppState;
use crate::user::{CreateUserRequest, UserListResponse, UserResponse};

/// GET /users - List users
#[tracing::instrument(name = "http.list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Json<UserListResponse> {
    let users = state.users.list().await;
    let total = users.len();

    Json(UserListResponse { users, total })
}

/// POST /users/new - Register a user
#[tracing::instrument(name = "http.create_user", skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>> {
    let user = state.users.create(request).await?;
    Ok(Json(UserResponse { user }))
}
