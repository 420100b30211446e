// ABOUTME: SQLite persistence layer for customers, users, activities, and notifications
// ABOUTME: Provides per-entity storage structs over a shared connection pool

pub mod activities;
pub mod customers;
pub mod db;
pub mod error;
pub mod notifications;
pub mod users;

pub use activities::ActivityStorage;
pub use customers::{CustomerFilter, CustomerStorage};
pub use db::{connect, init_schema};
pub use error::{StorageError, StorageResult};
pub use notifications::NotificationStorage;
pub use users::UserStorage;
