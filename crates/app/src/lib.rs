//! # pethub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PetStore` / `UserStore`: CRUD for pets and users inside a session
//!   - `Session`: a unit of work spanning both stores, committed at once
//!   - `UnitOfWork`: opens sessions
//! - Define **driving/inbound ports** as use-case structs:
//!   - `PetService`: create, update, delete, get, list
//!   - `UserService`: create, update, delete (with cascade), get, list
//! - Maintain the bidirectional pet/user ownership relationship
//!   (see [`services::ownership`])
//!
//! ## Dependency rule
//! Depends on `pethub-domain` only (plus `tracing`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
