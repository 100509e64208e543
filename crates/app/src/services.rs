//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod ownership;
pub mod pet_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod testing;
