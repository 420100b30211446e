// ABOUTME: Transition engine performing the persist, log, notify sequence
// ABOUTME: Step 1 is fatal on failure; activity and notification steps are best-effort

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use aquaflow_core::{
    ActivityCreateInput, ActivityType, Actor, Customer, CustomerStatus, NotificationCreateInput,
    NotificationType, Role,
};
use aquaflow_storage::{
    ActivityStorage, CustomerStorage, NotificationStorage, StorageError, UserStorage,
};

use crate::matrix::handoff_role;
use crate::validator::{validate, Decision, DenyReason};

/// How the transition was requested; recorded on the activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMethod {
    DragDrop,
    Manual,
}

impl TransitionMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransitionMethod::DragDrop => "drag_drop",
            TransitionMethod::Manual => "manual",
        }
    }
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("customer not found")]
    NotFound,
    #[error(transparent)]
    Denied(#[from] DenyReason),
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for TransitionError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => TransitionError::NotFound,
            other => TransitionError::Storage(other),
        }
    }
}

/// Executes validated status transitions. Callers are expected to have run
/// the validator already; the engine re-validates against the state it reads
/// so a race between read and write still fails closed.
pub struct TransitionEngine {
    customers: Arc<CustomerStorage>,
    activities: Arc<ActivityStorage>,
    notifications: Arc<NotificationStorage>,
    users: Arc<UserStorage>,
}

impl TransitionEngine {
    pub fn new(
        customers: Arc<CustomerStorage>,
        activities: Arc<ActivityStorage>,
        notifications: Arc<NotificationStorage>,
        users: Arc<UserStorage>,
    ) -> Self {
        Self {
            customers,
            activities,
            notifications,
            users,
        }
    }

    /// Move `customer_id` to `requested` on behalf of `actor`.
    ///
    /// Returns the post-persistence customer record. Activity logging and
    /// notification fan-out failures are logged and swallowed; the status
    /// change itself already succeeded.
    pub async fn execute(
        &self,
        actor: &Actor,
        customer_id: &str,
        requested: CustomerStatus,
        method: TransitionMethod,
    ) -> Result<Customer, TransitionError> {
        let customer = self.customers.get_customer(customer_id).await?;

        match validate(actor, &customer, requested) {
            Decision::Allow => {}
            Decision::Deny(reason) => {
                info!(
                    "Denied transition of {} to {} by {}: {}",
                    customer_id, requested, actor.id, reason
                );
                return Err(reason.into());
            }
        }

        // Idempotent no-op: nothing to persist, log, or announce.
        if requested == customer.status {
            return Ok(customer);
        }

        let previous = customer.status;

        // First-touch claim: a salesperson moving an unassigned customer
        // becomes its owner in the same write.
        let claim = (actor.role == Role::Salesperson && customer.assigned_to.is_none())
            .then(|| actor.id.as_str());

        let updated = self
            .customers
            .update_status(customer_id, requested, claim)
            .await?;

        info!(
            "Moved customer {} from {} to {} ({} by {})",
            customer_id,
            previous,
            requested,
            method.as_str(),
            actor.id
        );

        self.record_activity(actor, &updated, previous, method).await;
        self.notify_handoff(actor, &updated).await;

        Ok(updated)
    }

    async fn record_activity(
        &self,
        actor: &Actor,
        customer: &Customer,
        previous: CustomerStatus,
        method: TransitionMethod,
    ) {
        let input = ActivityCreateInput {
            customer_id: customer.id.clone(),
            activity_type: ActivityType::StatusChange,
            description: format!("Status changed from {} to {}", previous, customer.status),
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            metadata: Some(json!({
                "previous_status": previous,
                "new_status": customer.status,
                "method": method.as_str(),
            })),
        };

        if let Err(e) = self.activities.insert_activity(input).await {
            warn!(
                "Failed to record status change activity for {}: {}",
                customer.id, e
            );
        }
    }

    async fn notify_handoff(&self, actor: &Actor, customer: &Customer) {
        let Some(team) = handoff_role(customer.status) else {
            return;
        };

        let recipients = match self.users.list_active_by_role(team).await {
            Ok(users) => users,
            Err(e) => {
                warn!("Failed to list {} users for handoff: {}", team, e);
                return;
            }
        };

        let notification_type = match customer.status {
            CustomerStatus::Sold => NotificationType::CustomerSold,
            _ => NotificationType::InstallationReady,
        };
        let title = match notification_type {
            NotificationType::CustomerSold => "Customer sold".to_string(),
            NotificationType::InstallationReady => "Ready for installation".to_string(),
        };

        let inputs: Vec<NotificationCreateInput> = recipients
            .into_iter()
            .map(|user| NotificationCreateInput {
                recipient_id: user.id,
                customer_id: customer.id.clone(),
                notification_type,
                title: title.clone(),
                message: format!(
                    "{} moved {} to {}",
                    actor.name, customer.name, customer.status
                ),
                payload: Some(json!({
                    "customer_id": customer.id,
                    "new_status": customer.status,
                    "moved_by": actor.id,
                })),
            })
            .collect();

        if inputs.is_empty() {
            return;
        }

        if let Err(e) = self.notifications.insert_notifications(&inputs).await {
            warn!(
                "Failed to create handoff notifications for {}: {}",
                customer.id, e
            );
        }
    }
}
