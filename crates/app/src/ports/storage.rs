//! Storage port: a unit of work over the pet and user stores.
//!
//! Every service operation opens one [`Session`] through [`UnitOfWork::begin`],
//! performs all of its pet and user reads and writes through it, and then
//! calls [`Session::commit`]. A session dropped without a commit is rolled
//! back, so the entity write and the relationship write of one operation
//! become durable together or not at all.

use std::future::Future;

use pethub_domain::error::PetHubError;
use pethub_domain::id::{PetId, UserId};
use pethub_domain::pet::{Pet, PetFilter};
use pethub_domain::user::{User, UserFilter};

/// Pet persistence, scoped to a session.
pub trait PetStore {
    /// Persist a new pet.
    fn insert_pet(&mut self, pet: &Pet) -> impl Future<Output = Result<(), PetHubError>> + Send;

    fn find_pet(
        &mut self,
        id: PetId,
    ) -> impl Future<Output = Result<Option<Pet>, PetHubError>> + Send;

    /// Return every pet matching `filter`.
    fn list_pets(
        &mut self,
        filter: &PetFilter,
    ) -> impl Future<Output = Result<Vec<Pet>, PetHubError>> + Send;

    /// Overwrite an existing pet.
    fn update_pet(&mut self, pet: &Pet) -> impl Future<Output = Result<(), PetHubError>> + Send;

    /// Remove a pet. Resolves to `false` when no such pet existed.
    fn delete_pet(&mut self, id: PetId) -> impl Future<Output = Result<bool, PetHubError>> + Send;

    /// Remove several pets at once, resolving to the number removed.
    fn delete_pets(
        &mut self,
        ids: &[PetId],
    ) -> impl Future<Output = Result<u64, PetHubError>> + Send;
}

/// User persistence, scoped to a session.
///
/// A user's `pet_ids` are part of the user record: `insert_user` and
/// `update_user` persist them, `find_user` and `list_users` load them.
pub trait UserStore {
    fn insert_user(&mut self, user: &User) -> impl Future<Output = Result<(), PetHubError>> + Send;

    fn find_user(
        &mut self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, PetHubError>> + Send;

    fn list_users(
        &mut self,
        filter: &UserFilter,
    ) -> impl Future<Output = Result<Vec<User>, PetHubError>> + Send;

    /// Overwrite an existing user, including its owned pet set.
    fn update_user(&mut self, user: &User) -> impl Future<Output = Result<(), PetHubError>> + Send;

    /// Remove a user and its owned pet set. Resolves to `false` when no such
    /// user existed. The pets themselves are not touched.
    fn delete_user(
        &mut self,
        id: UserId,
    ) -> impl Future<Output = Result<bool, PetHubError>> + Send;
}

/// One unit of work spanning both stores.
pub trait Session: PetStore + UserStore + Send {
    /// Make every write performed through this session durable.
    fn commit(self) -> impl Future<Output = Result<(), PetHubError>> + Send;
}

/// Factory for sessions.
pub trait UnitOfWork {
    type Session: Session;

    fn begin(&self) -> impl Future<Output = Result<Self::Session, PetHubError>> + Send;
}
