// ABOUTME: Drag interaction session with optimistic updates and reconciliation
// ABOUTME: Idle -> Dragging -> dropped -> Idle, one pending transition at a time

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::{timeout, Instant};
use tracing::{debug, warn};

use aquaflow_core::{Actor, Customer, CustomerStatus};
use aquaflow_pipeline::{validate, Decision};

use crate::projection::{project_board, BoardColumn};

const DEFAULT_MOVE_TIMEOUT: Duration = Duration::from_secs(15);
const ERROR_DISPLAY_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("permission denied: {0}")]
    Denied(String),
    #[error("customer not found")]
    NotFound,
    #[error("transport error: {0}")]
    Transport(String),
}

/// The session's view of the server. Implemented by the HTTP client in the
/// real application and by mocks in tests.
#[async_trait]
pub trait CustomerSource: Send + Sync {
    async fn fetch_customers(&self) -> Result<Vec<Customer>, SourceError>;
    async fn move_customer(
        &self,
        customer_id: &str,
        status: CustomerStatus,
    ) -> Result<Customer, SourceError>;
}

#[async_trait]
impl<T: CustomerSource + ?Sized> CustomerSource for Arc<T> {
    async fn fetch_customers(&self) -> Result<Vec<Customer>, SourceError> {
        (**self).fetch_customers().await
    }

    async fn move_customer(
        &self,
        customer_id: &str,
        status: CustomerStatus,
    ) -> Result<Customer, SourceError> {
        (**self).move_customer(customer_id, status).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging {
        customer_id: String,
        from: CustomerStatus,
    },
}

/// The single in-flight transition. `Some` while a move is awaiting the
/// server; new drags are refused until it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingTransition {
    customer_id: String,
    from: CustomerStatus,
    to: CustomerStatus,
}

#[derive(Debug)]
struct TransientError {
    message: String,
    raised_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Server accepted the move; the board shows reconciled state.
    Moved,
    /// Dropped on the card's own column; no network call was made.
    NoOp,
    /// Server refused or failed; the board was rolled back by re-fetch.
    Reverted(String),
    /// No drag was in progress.
    NotDragging,
}

/// One viewer's board. Owns the in-memory customer collection for the
/// session; every mutation goes through the source or a full re-fetch.
pub struct BoardSession<S> {
    source: S,
    viewer: Actor,
    customers: Vec<Customer>,
    drag: DragState,
    pending: Option<PendingTransition>,
    error: Option<TransientError>,
    move_timeout: Duration,
}

impl<S: CustomerSource> BoardSession<S> {
    pub fn new(source: S, viewer: Actor) -> Self {
        Self {
            source,
            viewer,
            customers: Vec::new(),
            drag: DragState::Idle,
            pending: None,
            error: None,
            move_timeout: DEFAULT_MOVE_TIMEOUT,
        }
    }

    pub fn with_move_timeout(mut self, move_timeout: Duration) -> Self {
        self.move_timeout = move_timeout;
        self
    }

    /// Replace the local collection with authoritative server state.
    pub async fn refresh(&mut self) -> Result<(), SourceError> {
        self.customers = self.source.fetch_customers().await?;
        Ok(())
    }

    pub fn columns(&self) -> Vec<BoardColumn> {
        project_board(&self.customers, self.viewer.role)
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_updating(&self) -> bool {
        self.pending.is_some()
    }

    /// The failure message from the last reverted drop, until it expires.
    pub fn current_error(&self) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|e| e.raised_at.elapsed() < ERROR_DISPLAY_TTL)
            .map(|e| e.message.as_str())
    }

    /// Pick up a card. Refused while a transition is in flight or when the
    /// customer is not on this board.
    pub fn begin_drag(&mut self, customer_id: &str) -> bool {
        if self.pending.is_some() || self.drag != DragState::Idle {
            return false;
        }
        let Some(customer) = self.customers.iter().find(|c| c.id == customer_id) else {
            return false;
        };
        self.drag = DragState::Dragging {
            customer_id: customer.id.clone(),
            from: customer.status,
        };
        true
    }

    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Drop the dragged card on `target`. Validates locally first, then
    /// applies the optimistic patch, issues the move, and reconciles against
    /// a fresh fetch on success and failure alike.
    pub async fn drop_on(&mut self, target: CustomerStatus) -> DropOutcome {
        let drag = std::mem::replace(&mut self.drag, DragState::Idle);
        let DragState::Dragging { customer_id, from } = drag else {
            return DropOutcome::NotDragging;
        };

        if target == from {
            debug!("Dropped {} on its own column, nothing to do", customer_id);
            return DropOutcome::NoOp;
        }

        // A drop the validator refuses never leaves the client: no optimistic
        // patch, no round trip, the board stays as it is.
        if let Some(customer) = self.customers.iter().find(|c| c.id == customer_id) {
            if let Decision::Deny(reason) = validate(&self.viewer, customer, target) {
                let message = reason.to_string();
                debug!("Drop of {} on {} refused locally: {}", customer_id, target, message);
                self.error = Some(TransientError {
                    message: message.clone(),
                    raised_at: Instant::now(),
                });
                return DropOutcome::Reverted(message);
            }
        }

        // Optimistic patch: immediate visual feedback before the round trip.
        if let Some(customer) = self.customers.iter_mut().find(|c| c.id == customer_id) {
            customer.status = target;
        }
        self.pending = Some(PendingTransition {
            customer_id: customer_id.clone(),
            from,
            to: target,
        });

        let result = match timeout(
            self.move_timeout,
            self.source.move_customer(&customer_id, target),
        )
        .await
        {
            Ok(inner) => inner,
            Err(_) => Err(SourceError::Transport(format!(
                "transition timed out after {}s",
                self.move_timeout.as_secs()
            ))),
        };

        self.reconcile(&customer_id, from, &result).await;
        self.pending = None;

        match result {
            Ok(_) => {
                // A stale failure message must not outlive a later success.
                self.error = None;
                DropOutcome::Moved
            }
            Err(e) => {
                let message = e.to_string();
                warn!("Transition of {} to {} reverted: {}", customer_id, target, message);
                self.error = Some(TransientError {
                    message: message.clone(),
                    raised_at: Instant::now(),
                });
                DropOutcome::Reverted(message)
            }
        }
    }

    /// Discard the optimistic patch in favor of server truth. When the fetch
    /// itself fails we still never leave the card in limbo: on a failed move
    /// it falls back to its pre-drag column, on a successful move to the
    /// record the server returned.
    async fn reconcile(
        &mut self,
        customer_id: &str,
        from: CustomerStatus,
        result: &Result<Customer, SourceError>,
    ) {
        match self.source.fetch_customers().await {
            Ok(fresh) => self.customers = fresh,
            Err(fetch_err) => {
                warn!("Reconciliation fetch failed: {}", fetch_err);
                if let Some(local) = self.customers.iter_mut().find(|c| c.id == customer_id) {
                    match result {
                        Ok(updated) => *local = updated.clone(),
                        Err(_) => local.status = from,
                    }
                }
            }
        }
    }
}
