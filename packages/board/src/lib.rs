// ABOUTME: Kanban board derivation and the client-side drag interaction machine
// ABOUTME: Pure projection plus an optimistic-update session with reconciliation

pub mod projection;
pub mod session;

pub use projection::{project_board, BoardColumn};
pub use session::{BoardSession, CustomerSource, DragState, DropOutcome, SourceError};
