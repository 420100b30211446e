// ABOUTME: HTTP request handlers for customer operations
// ABOUTME: CRUD, the status-move endpoint, and the per-customer activity feed

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use aquaflow_core::{
    Activity, ActivityCreateInput, ActivityType, Customer, CustomerCreateInput, CustomerStatus,
    CustomerUpdateInput, Priority, Role,
};
use aquaflow_pipeline::TransitionMethod;
use aquaflow_storage::CustomerFilter;

use crate::auth::CurrentUser;
use crate::pagination::{PaginatedResponse, PaginationParams};
use crate::response::{ApiError, ApiResponse};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListCustomersQuery {
    pub status: Option<CustomerStatus>,
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,
}

/// List customers with optional status/assignee filters
pub async fn list_customers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ListCustomersQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Customer>>>, ApiError> {
    info!("Listing customers (page: {})", pagination.page());

    let filter = CustomerFilter {
        status: query.status,
        assigned_to: query.assigned_to,
        limit: Some(pagination.limit()),
        offset: Some(pagination.offset()),
    };
    let (customers, total) = state.customer_storage.list_customers(&filter).await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        customers,
        &pagination,
        total,
    ))))
}

/// Get a single customer by ID
pub async fn get_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<String>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    info!("Getting customer: {}", customer_id);

    let customer = state.customer_storage.get_customer(&customer_id).await?;
    Ok(Json(ApiResponse::success(customer)))
}

/// Request body for creating a customer
#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
    pub priority: Option<Priority>,
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,
    #[serde(rename = "saleAmount")]
    pub sale_amount: Option<f64>,
    #[serde(rename = "saleDate")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(rename = "needsAnalysis")]
    pub needs_analysis: Option<serde_json::Value>,
}

/// Create a new customer
pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    info!("Creating customer '{}'", request.name);

    let input = CustomerCreateInput {
        name: request.name,
        phone: request.phone,
        email: request.email,
        address: request.address,
        status: request.status,
        priority: request.priority,
        assigned_to: request.assigned_to,
        sale_amount: request.sale_amount,
        sale_date: request.sale_date,
        needs_analysis: request.needs_analysis,
    };
    let customer = state.customer_storage.create_customer(input).await?;

    // Creation shows up in the history feed; best-effort like the engine's
    // activity step.
    let activity = ActivityCreateInput {
        customer_id: customer.id.clone(),
        activity_type: ActivityType::Created,
        description: format!("Customer {} created", customer.name),
        actor_id: current_user.id.clone(),
        actor_name: current_user.name.clone(),
        metadata: None,
    };
    if let Err(e) = state.activity_storage.insert_activity(activity).await {
        warn!("Failed to record creation activity for {}: {}", customer.id, e);
    }

    Ok(Json(ApiResponse::success(customer)))
}

/// Request body for updating a customer
#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub priority: Option<Priority>,
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,
    #[serde(rename = "saleAmount")]
    pub sale_amount: Option<f64>,
    #[serde(rename = "saleDate")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(rename = "needsAnalysis")]
    pub needs_analysis: Option<serde_json::Value>,
}

/// Update customer contact and sales fields. Status changes go through the
/// move endpoint, never through here.
pub async fn update_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<String>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    info!("Updating customer: {}", customer_id);

    let input = CustomerUpdateInput {
        name: request.name,
        phone: request.phone,
        email: request.email,
        address: request.address,
        priority: request.priority,
        assigned_to: request.assigned_to,
        sale_amount: request.sale_amount,
        sale_date: request.sale_date,
        needs_analysis: request.needs_analysis,
    };
    let customer = state
        .customer_storage
        .update_customer(&customer_id, input)
        .await?;
    Ok(Json(ApiResponse::success(customer)))
}

/// Delete a customer (admin only)
pub async fn delete_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if current_user.role != Role::Admin {
        return Err(ApiError::Forbidden(
            "only admins can delete customers".to_string(),
        ));
    }

    info!("Deleting customer: {}", customer_id);
    state.customer_storage.delete_customer(&customer_id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": customer_id }))))
}

/// Request body for moving a customer between pipeline stages
#[derive(Deserialize)]
pub struct MoveCustomerRequest {
    pub status: CustomerStatus,
    pub method: Option<TransitionMethod>,
}

/// Move a customer to a new status through the transition engine
pub async fn move_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<String>,
    Json(request): Json<MoveCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    info!(
        "Moving customer {} to {} for {}",
        customer_id, request.status, current_user.id
    );

    let customer = state
        .engine
        .execute(
            &current_user.actor(),
            &customer_id,
            request.status,
            request.method.unwrap_or(TransitionMethod::DragDrop),
        )
        .await?;

    Ok(Json(ApiResponse::success(customer)))
}

/// List a customer's activity history
pub async fn list_activities(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Activity>>>, ApiError> {
    info!("Listing activities for customer: {}", customer_id);

    // 404 for unknown customers rather than an empty feed
    state.customer_storage.get_customer(&customer_id).await?;

    let (activities, total) = state
        .activity_storage
        .list_for_customer(
            &customer_id,
            Some(pagination.limit()),
            Some(pagination.offset()),
        )
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        activities,
        &pagination,
        total,
    ))))
}
