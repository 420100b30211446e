// ABOUTME: Domain type definitions for customers, users, activities, and notifications
// ABOUTME: Structures shared across the pipeline, storage, board, and API packages

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a string does not map to one of the fixed enum values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

/// Customer pipeline status. One canonical enum for the whole system;
/// every persisted status is one of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    NotHandled,
    NoAnswer,
    CallAgain,
    NotInterested,
    MeetingBooked,
    QuotationStage,
    ExtendedWaterTest,
    Sold,
    ReadyForInstallation,
    InstallationComplete,
    Archived,
}

impl CustomerStatus {
    /// Every status, in pipeline order.
    pub const ALL: [CustomerStatus; 11] = [
        CustomerStatus::NotHandled,
        CustomerStatus::NoAnswer,
        CustomerStatus::CallAgain,
        CustomerStatus::NotInterested,
        CustomerStatus::MeetingBooked,
        CustomerStatus::QuotationStage,
        CustomerStatus::ExtendedWaterTest,
        CustomerStatus::Sold,
        CustomerStatus::ReadyForInstallation,
        CustomerStatus::InstallationComplete,
        CustomerStatus::Archived,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::NotHandled => "not_handled",
            CustomerStatus::NoAnswer => "no_answer",
            CustomerStatus::CallAgain => "call_again",
            CustomerStatus::NotInterested => "not_interested",
            CustomerStatus::MeetingBooked => "meeting_booked",
            CustomerStatus::QuotationStage => "quotation_stage",
            CustomerStatus::ExtendedWaterTest => "extended_water_test",
            CustomerStatus::Sold => "sold",
            CustomerStatus::ReadyForInstallation => "ready_for_installation",
            CustomerStatus::InstallationComplete => "installation_complete",
            CustomerStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

/// User role. Immutable for the duration of a session; every transition
/// decision is a pure function of role, current status, requested status,
/// and ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Salesperson,
    Inhouse,
    Installer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Salesperson, Role::Inhouse, Role::Installer, Role::Admin];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Salesperson => "salesperson",
            Role::Inhouse => "inhouse",
            Role::Installer => "installer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// The acting user for a request. Identity is supplied explicitly on every
/// call into the core; no ambient session state is read below the API layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub priority: Priority,
    pub assigned_to: Option<String>,
    pub sale_amount: Option<f64>,
    pub sale_date: Option<DateTime<Utc>>,
    pub needs_analysis: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerCreateInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub sale_amount: Option<f64>,
    pub sale_date: Option<DateTime<Utc>>,
    pub needs_analysis: Option<serde_json::Value>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerUpdateInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub sale_amount: Option<f64>,
    pub sale_date: Option<DateTime<Utc>>,
    pub needs_analysis: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreateInput {
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    StatusChange,
    Note,
    Created,
    Assigned,
}

/// Append-only log entry. Never mutated or deleted once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub customer_id: String,
    pub activity_type: ActivityType,
    pub description: String,
    pub actor_id: String,
    pub actor_name: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ActivityCreateInput {
    pub customer_id: String,
    pub activity_type: ActivityType,
    pub description: String,
    pub actor_id: String,
    pub actor_name: String,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    CustomerSold,
    InstallationReady,
}

/// Cross-team handoff notification. Created by the transition engine as a
/// fire-and-forget side effect; the core never reads these back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    pub customer_id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub payload: Option<serde_json::Value>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NotificationCreateInput {
    pub recipient_id: String,
    pub customer_id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub payload: Option<serde_json::Value>,
}
