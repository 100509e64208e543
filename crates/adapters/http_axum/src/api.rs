//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod pets;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use axum::Router;
use axum::routing::get;

use pethub_app::ports::UnitOfWork;

use crate::state::AppState;

/// Build the pets and users routes.
pub fn routes<U>() -> Router<AppState<U>>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    Router::new()
        // Pets
        .route("/pets", get(pets::list::<U>).post(pets::create::<U>))
        .route(
            "/pets/{id}",
            get(pets::get::<U>)
                .put(pets::update::<U>)
                .delete(pets::delete::<U>),
        )
        // Users
        .route("/users", get(users::list::<U>).post(users::create::<U>))
        .route(
            "/users/{id}",
            get(users::get::<U>)
                .put(users::update::<U>)
                .delete(users::delete::<U>),
        )
}
