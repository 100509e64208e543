//! Shared application state for axum handlers.

use std::sync::Arc;

use pethub_app::ports::UnitOfWork;
use pethub_app::services::pet_service::PetService;
use pethub_app::services::user_service::UserService;

/// Application state shared across all axum handlers.
///
/// Generic over the unit of work to avoid dynamic dispatch. `Clone` is
/// implemented manually so the unit of work itself does not need to be
/// `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<U> {
    /// Pet CRUD service.
    pub pet_service: Arc<PetService<U>>,
    /// User CRUD service.
    pub user_service: Arc<UserService<U>>,
}

impl<U> Clone for AppState<U> {
    fn clone(&self) -> Self {
        Self {
            pet_service: Arc::clone(&self.pet_service),
            user_service: Arc::clone(&self.user_service),
        }
    }
}

impl<U> AppState<U>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(pet_service: PetService<U>, user_service: UserService<U>) -> Self {
        Self {
            pet_service: Arc::new(pet_service),
            user_service: Arc::new(user_service),
        }
    }
}
