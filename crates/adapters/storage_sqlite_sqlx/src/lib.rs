//! # pethub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the storage port traits defined in `pethub-app::ports::storage`
//! - Map each session onto one `SQLite` transaction
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `pethub-app` (for port traits) and `pethub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
mod pet_repo;
pub mod pool;
pub mod unit_of_work;
mod user_repo;

pub use pool::{Config, Database};
pub use unit_of_work::{SqliteSession, SqliteUnitOfWork};
