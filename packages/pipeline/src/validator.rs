// ABOUTME: Pure transition validation against the status matrix and ownership rule
// ABOUTME: No side effects, so the full input domain is unit-testable

use thiserror::Error;

use aquaflow_core::{Actor, Customer, CustomerStatus, Role};

use crate::matrix::allowed_next_statuses;

/// Why a transition was refused. `NotOwner` is deliberately distinct from
/// `RoleTransition` so callers can tell an ownership conflict apart from a
/// matrix denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("{role} cannot move a customer from {from} to {to}")]
    RoleTransition {
        role: Role,
        from: CustomerStatus,
        to: CustomerStatus,
    },
    #[error("customer is assigned to another salesperson")]
    NotOwner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `actor` may move `customer` to `requested`.
///
/// Requesting the status the customer already has is an explicit idempotent
/// `Allow`. Salespeople are ownership-restricted: a customer assigned to a
/// different salesperson is off limits regardless of the matrix.
pub fn validate(actor: &Actor, customer: &Customer, requested: CustomerStatus) -> Decision {
    if requested == customer.status {
        return Decision::Allow;
    }

    if !allowed_next_statuses(actor.role, customer.status).contains(&requested) {
        return Decision::Deny(DenyReason::RoleTransition {
            role: actor.role,
            from: customer.status,
            to: requested,
        });
    }

    if actor.role == Role::Salesperson {
        if let Some(owner) = &customer.assigned_to {
            if owner != &actor.id {
                return Decision::Deny(DenyReason::NotOwner);
            }
        }
    }

    Decision::Allow
}
