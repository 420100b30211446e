// ABOUTME: HTTP request handlers for user lookups
// ABOUTME: Current-user echo and the active-users-by-role listing

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use aquaflow_core::{Role, User};

use crate::auth::CurrentUser;
use crate::response::{ApiError, ApiResponse};
use crate::AppState;

#[derive(Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Echo the identity resolved for this request
pub async fn get_current_user(
    current_user: CurrentUser,
) -> Json<ApiResponse<CurrentUserResponse>> {
    Json(ApiResponse::success(CurrentUserResponse {
        id: current_user.id,
        name: current_user.name,
        role: current_user.role,
    }))
}

#[derive(Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
}

/// List users, optionally restricted to the active members of one role
pub async fn list_users(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    info!("Listing users (role: {:?})", query.role);

    let users = match query.role {
        Some(role) => state.user_storage.list_active_by_role(role).await?,
        None => state.user_storage.list_users().await?,
    };
    Ok(Json(ApiResponse::success(users)))
}
