//! # pethub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON REST API** for pets and users
//!   (`/pets`, `/pets/{id}`, `/users`, `/users/{id}`)
//! - Map HTTP requests (path ids, query filters, JSON bodies) into
//!   application service calls (driving adapter)
//! - Map application results into HTTP status codes and JSON bodies
//!
//! ## Dependency rule
//! Depends on `pethub-app` (for port traits and services) and `pethub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
