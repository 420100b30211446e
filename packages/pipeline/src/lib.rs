// ABOUTME: Role-gated pipeline transitions for Aquaflow
// ABOUTME: Status matrix, pure validation, and the side-effecting transition engine

pub mod engine;
pub mod matrix;
pub mod validator;

pub use engine::{TransitionEngine, TransitionError, TransitionMethod};
pub use matrix::{allowed_next_statuses, handoff_role};
pub use validator::{validate, Decision, DenyReason};
