// ABOUTME: Handler-level tests driving the router with in-memory requests
// ABOUTME: Covers identity rejection, the move endpoint's status classes, and the board

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use aquaflow_api::{create_router, AppState};
use aquaflow_core::{CustomerCreateInput, CustomerStatus, Role, UserCreateInput};
use aquaflow_storage::init_schema;

async fn test_state() -> AppState {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    init_schema(&pool).await.unwrap();
    AppState::new(pool)
}

async fn seed_customer(state: &AppState, status: CustomerStatus, assigned_to: Option<&str>) -> String {
    state
        .customer_storage
        .create_customer(CustomerCreateInput {
            name: "Anna Berg".to_string(),
            phone: "070-123 45 67".to_string(),
            status: Some(status),
            assigned_to: assigned_to.map(str::to_string),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

fn as_salesperson(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder
        .header("x-user-id", "user-sales-a")
        .header("x-user-name", "Stina")
        .header("x-user-role", "salesperson")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn requests_without_identity_get_401() {
    let app = create_router(test_state().await);

    let response = app
        .oneshot(Request::builder().uri("/api/customers").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn health_needs_no_identity() {
    let app = create_router(test_state().await);

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn valid_move_returns_updated_customer() {
    let state = test_state().await;
    let id = seed_customer(&state, CustomerStatus::NotHandled, None).await;
    let app = create_router(state);

    let request = as_salesperson(
        Request::builder()
            .method("POST")
            .uri(format!("/api/customers/{id}/status"))
            .header("content-type", "application/json"),
    )
    .body(Body::from(json!({ "status": "meeting_booked" }).to_string()))
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "meeting_booked");
    // First-touch claim rides along in the same write.
    assert_eq!(body["data"]["assigned_to"], "user-sales-a");
}

#[tokio::test]
async fn denied_move_returns_403_with_machine_code() {
    let state = test_state().await;
    let id = seed_customer(&state, CustomerStatus::Sold, Some("user-sales-a")).await;
    let app = create_router(state);

    let request = as_salesperson(
        Request::builder()
            .method("POST")
            .uri(format!("/api/customers/{id}/status"))
            .header("content-type", "application/json"),
    )
    .body(Body::from(json!({ "status": "archived" }).to_string()))
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "permission_denied");
}

#[tokio::test]
async fn ownership_conflict_reads_differently_from_matrix_denial() {
    let state = test_state().await;
    let id = seed_customer(&state, CustomerStatus::NotHandled, Some("user-sales-b")).await;
    let app = create_router(state);

    let request = as_salesperson(
        Request::builder()
            .method("POST")
            .uri(format!("/api/customers/{id}/status"))
            .header("content-type", "application/json"),
    )
    .body(Body::from(json!({ "status": "meeting_booked" }).to_string()))
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(
        body["error"]["message"],
        "customer is assigned to another salesperson"
    );
}

#[tokio::test]
async fn moving_a_missing_customer_returns_404() {
    let app = create_router(test_state().await);

    let request = as_salesperson(
        Request::builder()
            .method("POST")
            .uri("/api/customers/cust-missing/status")
            .header("content-type", "application/json"),
    )
    .body(Body::from(json!({ "status": "meeting_booked" }).to_string()))
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn board_is_filtered_by_viewer_role() {
    let state = test_state().await;
    seed_customer(&state, CustomerStatus::MeetingBooked, None).await;
    seed_customer(&state, CustomerStatus::ReadyForInstallation, None).await;
    let app = create_router(state);

    let request = Request::builder()
        .uri("/api/board")
        .header("x-user-id", "user-installer-a")
        .header("x-user-role", "installer")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let columns = body["data"].as_array().unwrap();
    assert!(columns
        .iter()
        .all(|col| col["status"] != "meeting_booked"));
    let ready = columns
        .iter()
        .find(|col| col["status"] == "ready_for_installation")
        .unwrap();
    assert_eq!(ready["customers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_is_admin_only() {
    let state = test_state().await;
    let id = seed_customer(&state, CustomerStatus::NotHandled, None).await;
    let app = create_router(state);

    let request = as_salesperson(
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/customers/{id}")),
    )
    .body(Body::empty())
    .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/customers/{id}"))
        .header("x-user-id", "user-admin")
        .header("x-user-role", "admin")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn stats_keep_counting_archived_sales_as_won() {
    let state = test_state().await;
    for (status, sale_amount) in [
        (CustomerStatus::Sold, Some(40_000.0)),
        (CustomerStatus::Archived, Some(35_000.0)),
        (CustomerStatus::Archived, None),
    ] {
        state
            .customer_storage
            .create_customer(CustomerCreateInput {
                name: "Anna Berg".to_string(),
                phone: "070-123 45 67".to_string(),
                status: Some(status),
                sale_amount,
                ..Default::default()
            })
            .await
            .unwrap();
    }
    let app = create_router(state);

    let request = as_salesperson(Request::builder().uri("/api/stats"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["totalCustomers"], 3);
    // The archived customer with a sale stays in the won totals; the one
    // that never sold does not.
    assert_eq!(body["data"]["soldCount"], 2);
    assert_eq!(body["data"]["totalSaleAmount"], 75_000.0);
}

#[tokio::test]
async fn handoff_notifications_reach_the_downstream_team() {
    let state = test_state().await;
    let id = seed_customer(&state, CustomerStatus::Sold, None).await;
    let installer = state
        .user_storage
        .create_user(UserCreateInput {
            name: "Ivar".to_string(),
            email: None,
            role: Role::Installer,
        })
        .await
        .unwrap();
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/customers/{id}/status"))
        .header("content-type", "application/json")
        .header("x-user-id", "user-inhouse-a")
        .header("x-user-role", "inhouse")
        .body(Body::from(json!({ "status": "ready_for_installation" }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/api/notifications")
        .header("x-user-id", installer.id.as_str())
        .header("x-user-role", "installer")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["unreadCount"], 1);
    assert_eq!(
        body["data"]["notifications"][0]["notification_type"],
        "installation_ready"
    );
}
