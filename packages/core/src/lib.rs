// ABOUTME: Core types and column configuration for the Aquaflow CRM
// ABOUTME: Foundational package shared by every other Aquaflow package

pub mod columns;
pub mod types;

// Re-export main types
pub use columns::{ColumnConfig, BOARD_COLUMNS};
pub use types::{
    Activity, ActivityCreateInput, ActivityType, Actor, Customer, CustomerCreateInput,
    CustomerStatus, CustomerUpdateInput, Notification, NotificationCreateInput, NotificationType,
    Priority, Role, UnknownValue, User, UserCreateInput,
};
