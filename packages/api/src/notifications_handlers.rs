// ABOUTME: HTTP request handlers for the notification center
// ABOUTME: Recipients list their notifications and mark them read

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use aquaflow_core::Notification;

use crate::auth::CurrentUser;
use crate::response::{ApiError, ApiResponse};
use crate::AppState;

#[derive(Serialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    #[serde(rename = "unreadCount")]
    pub unread_count: i64,
}

/// List the current user's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<NotificationList>>, ApiError> {
    info!("Listing notifications for {}", current_user.id);

    let notifications = state
        .notification_storage
        .list_for_recipient(&current_user.id)
        .await?;
    let unread_count = state
        .notification_storage
        .unread_count(&current_user.id)
        .await?;

    Ok(Json(ApiResponse::success(NotificationList {
        notifications,
        unread_count,
    })))
}

/// Mark one of the current user's notifications as read
pub async fn mark_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(notification_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    info!(
        "Marking notification {} read for {}",
        notification_id, current_user.id
    );

    state
        .notification_storage
        .mark_read(&notification_id, &current_user.id)
        .await?;
    Ok(Json(ApiResponse::success(json!({ "read": notification_id }))))
}
