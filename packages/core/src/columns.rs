// ABOUTME: Static kanban column configuration for the pipeline board
// ABOUTME: One column per status with display metadata and per-role visibility

use crate::types::{CustomerStatus, Role};

/// Board column definition. Constructed once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct ColumnConfig {
    pub status: CustomerStatus,
    pub title: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub order: u8,
    pub visible_to: &'static [Role],
}

impl ColumnConfig {
    pub fn visible_to_role(&self, role: Role) -> bool {
        self.visible_to.contains(&role)
    }
}

const SALES: &[Role] = &[Role::Salesperson, Role::Admin];
const SALES_AND_INHOUSE: &[Role] = &[Role::Salesperson, Role::Inhouse, Role::Admin];
const INHOUSE_AND_INSTALLER: &[Role] = &[Role::Inhouse, Role::Installer, Role::Admin];
const BACK_OFFICE: &[Role] = &[Role::Inhouse, Role::Admin];

/// The single source of truth for board columns, in display order.
pub const BOARD_COLUMNS: &[ColumnConfig] = &[
    ColumnConfig {
        status: CustomerStatus::NotHandled,
        title: "Not handled",
        description: "New leads waiting for a first contact",
        color: "#94a3b8",
        order: 1,
        visible_to: SALES_AND_INHOUSE,
    },
    ColumnConfig {
        status: CustomerStatus::NoAnswer,
        title: "No answer",
        description: "Contact attempted, nobody picked up",
        color: "#fbbf24",
        order: 2,
        visible_to: SALES,
    },
    ColumnConfig {
        status: CustomerStatus::CallAgain,
        title: "Call again",
        description: "Customer asked to be called back",
        color: "#fb923c",
        order: 3,
        visible_to: SALES,
    },
    ColumnConfig {
        status: CustomerStatus::NotInterested,
        title: "Not interested",
        description: "Customer declined for now",
        color: "#f87171",
        order: 4,
        visible_to: SALES_AND_INHOUSE,
    },
    ColumnConfig {
        status: CustomerStatus::MeetingBooked,
        title: "Meeting booked",
        description: "Home visit or water test scheduled",
        color: "#60a5fa",
        order: 5,
        visible_to: SALES,
    },
    ColumnConfig {
        status: CustomerStatus::QuotationStage,
        title: "Quotation",
        description: "Offer sent, awaiting customer decision",
        color: "#818cf8",
        order: 6,
        visible_to: SALES,
    },
    ColumnConfig {
        status: CustomerStatus::ExtendedWaterTest,
        title: "Extended water test",
        description: "Lab analysis in progress",
        color: "#22d3ee",
        order: 7,
        visible_to: SALES,
    },
    ColumnConfig {
        status: CustomerStatus::Sold,
        title: "Sold",
        description: "Contract signed, handed to in-house staff",
        color: "#4ade80",
        order: 8,
        visible_to: SALES_AND_INHOUSE,
    },
    ColumnConfig {
        status: CustomerStatus::ReadyForInstallation,
        title: "Ready for installation",
        description: "Paperwork done, waiting for an installer",
        color: "#2dd4bf",
        order: 9,
        visible_to: INHOUSE_AND_INSTALLER,
    },
    ColumnConfig {
        status: CustomerStatus::InstallationComplete,
        title: "Installation complete",
        description: "System installed and verified",
        color: "#34d399",
        order: 10,
        visible_to: INHOUSE_AND_INSTALLER,
    },
    ColumnConfig {
        status: CustomerStatus::Archived,
        title: "Archived",
        description: "Closed records",
        color: "#64748b",
        order: 11,
        visible_to: BACK_OFFICE,
    },
];
