//! User service: use-cases for managing users.

use std::collections::BTreeSet;

use pethub_domain::error::{NotFoundError, PetHubError};
use pethub_domain::id::UserId;
use pethub_domain::time::Touch;
use pethub_domain::user::{User, UserFilter};

use crate::ports::{Session, UnitOfWork, UserStore};
use crate::services::ownership;

fn not_found(id: UserId) -> PetHubError {
    NotFoundError {
        entity: "User",
        id: id.to_string(),
    }
    .into()
}

/// Application service for user CRUD operations.
///
/// A user's pet set is only ever changed by the ownership rule; create and
/// update calls never take it from the caller.
pub struct UserService<U> {
    uow: U,
}

impl<U: UnitOfWork> UserService<U> {
    /// Create a new service backed by the given unit of work.
    pub fn new(uow: U) -> Self {
        Self { uow }
    }

    /// Create a new user owning no pets.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::Validation`] if invariants fail, or a
    /// storage error.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id, user_name = %user.name))]
    pub async fn create_user(&self, mut user: User) -> Result<User, PetHubError> {
        user.validate()?;
        user.pet_ids = BTreeSet::new();
        let mut session = self.uow.begin().await?;
        session.insert_user(&user).await?;
        session.commit().await?;
        tracing::info!("user created");
        Ok(user)
    }

    /// Look up a user by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::NotFound`] when no user with `id` exists,
    /// or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<User, PetHubError> {
        let mut session = self.uow.begin().await?;
        session.find_user(id).await?.ok_or_else(|| not_found(id))
    }

    /// List users matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the session.
    pub async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>, PetHubError> {
        let mut session = self.uow.begin().await?;
        session.list_users(&filter).await
    }

    /// Replace the profile fields of user `id` with those of `changes`.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::NotFound`] when no user with `id` exists,
    /// [`PetHubError::Validation`] if invariants fail, or a storage error.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_user(&self, id: UserId, changes: User) -> Result<User, PetHubError> {
        let mut session = self.uow.begin().await?;
        let existing = session.find_user(id).await?.ok_or_else(|| not_found(id))?;
        let mut updated = User {
            id,
            pet_ids: existing.pet_ids,
            created_at: existing.created_at,
            ..changes
        };
        updated.touch();
        updated.validate()?;

        session.update_user(&updated).await?;
        session.commit().await?;
        Ok(updated)
    }

    /// Delete a user together with every pet it owns. Returns the deleted user.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::NotFound`] when no user with `id` exists,
    /// or a storage error. Nothing is removed on error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<User, PetHubError> {
        let mut session = self.uow.begin().await?;
        let user = session.find_user(id).await?.ok_or_else(|| not_found(id))?;
        if !session.delete_user(id).await? {
            return Err(not_found(id));
        }
        let removed = ownership::cascade_delete_on_user_delete(&mut session, &user).await?;
        session.commit().await?;
        tracing::info!(pets_removed = removed, "user deleted");
        Ok(user)
    }
}
