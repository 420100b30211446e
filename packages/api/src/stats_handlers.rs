// ABOUTME: HTTP request handler for dashboard statistics
// ABOUTME: Aggregates the customer collection in memory per request

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use aquaflow_core::CustomerStatus;

use crate::auth::CurrentUser;
use crate::response::{ApiError, ApiResponse};
use crate::AppState;

#[derive(Serialize)]
pub struct SalespersonStats {
    #[serde(rename = "salespersonId")]
    pub salesperson_id: String,
    #[serde(rename = "soldCount")]
    pub sold_count: i64,
}

#[derive(Serialize)]
pub struct DashboardStats {
    #[serde(rename = "totalCustomers")]
    pub total_customers: i64,
    #[serde(rename = "byStatus")]
    pub by_status: HashMap<CustomerStatus, i64>,
    #[serde(rename = "soldCount")]
    pub sold_count: i64,
    #[serde(rename = "totalSaleAmount")]
    pub total_sale_amount: f64,
    #[serde(rename = "bySalesperson")]
    pub by_salesperson: Vec<SalespersonStats>,
}

/// Aggregate pipeline statistics from one customer read
pub async fn get_stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    info!("Building dashboard stats for {}", current_user.id);

    let customers = state.customer_storage.list_all().await?;

    let mut by_status: HashMap<CustomerStatus, i64> = HashMap::new();
    for status in CustomerStatus::ALL {
        by_status.insert(status, 0);
    }
    let mut sold_count = 0;
    let mut total_sale_amount = 0.0;
    let mut per_salesperson: HashMap<String, i64> = HashMap::new();

    for customer in &customers {
        *by_status.entry(customer.status).or_insert(0) += 1;
        // Statuses at or past `sold` count as won deals. Archived records
        // stay won when they carry a sale, so closing a customer out never
        // deflates historical totals.
        let won = matches!(
            customer.status,
            CustomerStatus::Sold
                | CustomerStatus::ReadyForInstallation
                | CustomerStatus::InstallationComplete
        ) || (customer.status == CustomerStatus::Archived && customer.sale_amount.is_some());
        if won {
            sold_count += 1;
            total_sale_amount += customer.sale_amount.unwrap_or(0.0);
            if let Some(assigned_to) = &customer.assigned_to {
                *per_salesperson.entry(assigned_to.clone()).or_insert(0) += 1;
            }
        }
    }

    let mut by_salesperson: Vec<SalespersonStats> = per_salesperson
        .into_iter()
        .map(|(salesperson_id, sold_count)| SalespersonStats {
            salesperson_id,
            sold_count,
        })
        .collect();
    by_salesperson.sort_by(|a, b| b.sold_count.cmp(&a.sold_count));

    Ok(Json(ApiResponse::success(DashboardStats {
        total_customers: customers.len() as i64,
        by_status,
        sold_count,
        total_sale_amount,
        by_salesperson,
    })))
}
