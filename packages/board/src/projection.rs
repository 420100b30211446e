// ABOUTME: Role-filtered projection of the customer collection into board columns
// ABOUTME: Full recompute on every call; no incremental diffing

use serde::Serialize;

use aquaflow_core::{Customer, CustomerStatus, Role, BOARD_COLUMNS};

/// One rendered board column: static column metadata plus the customers
/// currently at that status.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub status: CustomerStatus,
    pub title: String,
    pub description: String,
    pub color: String,
    pub order: u8,
    pub customers: Vec<Customer>,
}

/// Derive the board for one viewer. Columns not visible to the viewer's role
/// are omitted entirely; customers at those statuses simply do not appear.
pub fn project_board(customers: &[Customer], role: Role) -> Vec<BoardColumn> {
    let mut columns: Vec<BoardColumn> = BOARD_COLUMNS
        .iter()
        .filter(|config| config.visible_to_role(role))
        .map(|config| BoardColumn {
            status: config.status,
            title: config.title.to_string(),
            description: config.description.to_string(),
            color: config.color.to_string(),
            order: config.order,
            customers: customers
                .iter()
                .filter(|c| c.status == config.status)
                .cloned()
                .collect(),
        })
        .collect();

    columns.sort_by_key(|c| c.order);
    columns
}
