// ABOUTME: HTTP request handler for the kanban board projection
// ABOUTME: Returns the viewer's role-filtered columns with their customers

use axum::{extract::State, Json};
use tracing::info;

use aquaflow_board::{project_board, BoardColumn};

use crate::auth::CurrentUser;
use crate::response::{ApiError, ApiResponse};
use crate::AppState;

/// Derive the board for the current user's role
pub async fn get_board(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<BoardColumn>>>, ApiError> {
    info!("Building board for {} ({})", current_user.id, current_user.role);

    let customers = state.customer_storage.list_all().await?;
    let columns = project_board(&customers, current_user.role);
    Ok(Json(ApiResponse::success(columns)))
}
