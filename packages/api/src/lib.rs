// ABOUTME: HTTP API layer for Aquaflow providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::SqlitePool;

use aquaflow_pipeline::TransitionEngine;
use aquaflow_storage::{ActivityStorage, CustomerStorage, NotificationStorage, UserStorage};

pub mod auth;
pub mod board_handlers;
pub mod customers_handlers;
pub mod notifications_handlers;
pub mod pagination;
pub mod response;
pub mod stats_handlers;
pub mod users_handlers;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub customer_storage: Arc<CustomerStorage>,
    pub activity_storage: Arc<ActivityStorage>,
    pub notification_storage: Arc<NotificationStorage>,
    pub user_storage: Arc<UserStorage>,
    pub engine: Arc<TransitionEngine>,
}

impl AppState {
    /// Create shared state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        let customer_storage = Arc::new(CustomerStorage::new(pool.clone()));
        let activity_storage = Arc::new(ActivityStorage::new(pool.clone()));
        let notification_storage = Arc::new(NotificationStorage::new(pool.clone()));
        let user_storage = Arc::new(UserStorage::new(pool.clone()));
        let engine = Arc::new(TransitionEngine::new(
            customer_storage.clone(),
            activity_storage.clone(),
            notification_storage.clone(),
            user_storage.clone(),
        ));

        Self {
            pool,
            customer_storage,
            activity_storage,
            notification_storage,
            user_storage,
            engine,
        }
    }
}

/// Creates the full API router mounted under /api
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/customers", get(customers_handlers::list_customers))
        .route("/api/customers", post(customers_handlers::create_customer))
        .route("/api/customers/{id}", get(customers_handlers::get_customer))
        .route("/api/customers/{id}", put(customers_handlers::update_customer))
        .route(
            "/api/customers/{id}",
            delete(customers_handlers::delete_customer),
        )
        .route(
            "/api/customers/{id}/status",
            post(customers_handlers::move_customer),
        )
        .route(
            "/api/customers/{id}/activities",
            get(customers_handlers::list_activities),
        )
        .route("/api/board", get(board_handlers::get_board))
        .route(
            "/api/notifications",
            get(notifications_handlers::list_notifications),
        )
        .route(
            "/api/notifications/{id}/read",
            put(notifications_handlers::mark_read),
        )
        .route("/api/users/current", get(users_handlers::get_current_user))
        .route("/api/users", get(users_handlers::list_users))
        .route("/api/stats", get(stats_handlers::get_stats))
        .with_state(state)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
