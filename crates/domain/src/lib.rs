//! # pethub-domain
//!
//! Pure domain model for the pethub service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Pets** (optionally owned by a user)
//! - Define **Users** (owning a set of pet identifiers)
//! - Define the list filters used by both aggregates
//! - Contain all invariant enforcement and domain logic
//!
//! ## Ownership model
//! A [`User`](user::User) holds the *ids* of the pets it owns and a
//! [`Pet`](pet::Pet) holds the optional id of its owner. Neither aggregate
//! embeds the other; cross-references are resolved through the stores.
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod pet;
pub mod user;
