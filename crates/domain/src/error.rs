//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`PetHubError`]
//! through `From` so that `?` works across crate boundaries.

use std::error::Error as StdError;

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum PetHubError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("storage error")]
    Storage(#[source] Box<dyn StdError + Send + Sync>),
}

/// A domain invariant was violated by caller-provided data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("email must not be empty")]
    EmptyEmail,

    #[error("email {0:?} is not a valid address")]
    InvalidEmail(String),

    #[error("{0:?} is not a valid identifier")]
    InvalidId(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
