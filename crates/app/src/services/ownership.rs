//! Pet/user ownership maintenance.
//!
//! A pet names its owner through `Pet::user_id` and the owner lists the pet
//! in `User::pet_ids`. Nothing in storage keeps the two sides in sync, so every
//! mutation that changes one side calls one of these steps on the same session
//! right after the entity write:
//!
//! | entity write     | relationship step                    |
//! |------------------|--------------------------------------|
//! | pet inserted     | [`attach_on_create`]                 |
//! | pet updated      | [`reassign_on_update`]               |
//! | pet deleted      | [`detach_on_delete`]                 |
//! | user deleted     | [`cascade_delete_on_user_delete`]    |
//!
//! Deleting a pet only unlinks it from its owner, while deleting a user
//! deletes all of its pets.

use pethub_domain::error::{NotFoundError, PetHubError};
use pethub_domain::id::{PetId, UserId};
use pethub_domain::pet::Pet;
use pethub_domain::time::Touch;
use pethub_domain::user::User;

use crate::ports::{PetStore, UserStore};

/// Load the owner named by a pet, failing with `NotFound` when it is missing.
async fn find_owner<S>(session: &mut S, user_id: UserId) -> Result<User, PetHubError>
where
    S: UserStore + Send,
{
    session.find_user(user_id).await?.ok_or_else(|| {
        NotFoundError {
            entity: "User",
            id: user_id.to_string(),
        }
        .into()
    })
}

async fn link<S>(session: &mut S, user_id: UserId, pet_id: PetId) -> Result<(), PetHubError>
where
    S: UserStore + Send,
{
    let mut user = find_owner(session, user_id).await?;
    if user.add_pet(pet_id) {
        user.touch();
        session.update_user(&user).await?;
    }
    tracing::debug!(%user_id, %pet_id, "pet attached to owner");
    Ok(())
}

async fn unlink<S>(session: &mut S, user_id: UserId, pet_id: PetId) -> Result<(), PetHubError>
where
    S: UserStore + Send,
{
    let mut user = find_owner(session, user_id).await?;
    if user.remove_pet(pet_id) {
        user.touch();
        session.update_user(&user).await?;
        tracing::debug!(%user_id, %pet_id, "pet detached from owner");
    } else {
        tracing::debug!(%user_id, %pet_id, "pet was not linked to owner, nothing to detach");
    }
    Ok(())
}

/// Add a freshly inserted pet to its owner's pet set.
///
/// # Errors
///
/// Returns [`PetHubError::NotFound`] when the pet names an owner that does not
/// exist, or a storage error from the session.
pub async fn attach_on_create<S>(session: &mut S, pet: &Pet) -> Result<(), PetHubError>
where
    S: UserStore + Send,
{
    match pet.user_id {
        Some(user_id) => link(session, user_id, pet.id).await,
        None => Ok(()),
    }
}

/// Remove a just-deleted pet from its owner's pet set.
///
/// `pet` is the state captured before the deletion. Detaching a pet that is
/// not in the owner's set is a no-op.
///
/// # Errors
///
/// Returns [`PetHubError::NotFound`] when the recorded owner does not exist,
/// or a storage error from the session.
pub async fn detach_on_delete<S>(session: &mut S, pet: &Pet) -> Result<(), PetHubError>
where
    S: UserStore + Send,
{
    match pet.user_id {
        Some(user_id) => unlink(session, user_id, pet.id).await,
        None => Ok(()),
    }
}

/// Move a pet between owners after an update changed `user_id`.
///
/// # Errors
///
/// Returns [`PetHubError::NotFound`] when either owner does not exist, or a
/// storage error from the session.
pub async fn reassign_on_update<S>(
    session: &mut S,
    previous: &Pet,
    updated: &Pet,
) -> Result<(), PetHubError>
where
    S: UserStore + Send,
{
    if previous.user_id == updated.user_id {
        return Ok(());
    }
    if let Some(old_owner) = previous.user_id {
        unlink(session, old_owner, previous.id).await?;
    }
    if let Some(new_owner) = updated.user_id {
        link(session, new_owner, updated.id).await?;
    }
    Ok(())
}

/// Delete every pet owned by a just-deleted user.
///
/// Resolves to the number of pets removed.
///
/// # Errors
///
/// Returns a storage error from the session.
pub async fn cascade_delete_on_user_delete<S>(
    session: &mut S,
    user: &User,
) -> Result<u64, PetHubError>
where
    S: PetStore + Send,
{
    if user.pet_ids.is_empty() {
        return Ok(0);
    }
    let ids: Vec<PetId> = user.pet_ids.iter().copied().collect();
    let removed = session.delete_pets(&ids).await?;
    if removed != ids.len() as u64 {
        tracing::warn!(
            user_id = %user.id,
            expected = ids.len(),
            removed,
            "owner listed pets that were already gone"
        );
    }
    tracing::debug!(user_id = %user.id, removed, "cascaded pet deletion");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::UnitOfWork;
    use crate::services::testing::InMemoryStore;

    fn owner() -> User {
        User::builder()
            .name("Alice")
            .email("alice@example.com")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_add_pet_to_owner_when_attaching() {
        let store = InMemoryStore::default();
        let user = owner();
        store.seed_user(user.clone());
        let pet = Pet::builder().name("Rex").user_id(user.id).build().unwrap();

        let mut session = store.begin().await.unwrap();
        attach_on_create(&mut session, &pet).await.unwrap();
        assert!(session.working_user(user.id).unwrap().owns(pet.id));
    }

    #[tokio::test]
    async fn should_not_touch_any_user_when_pet_has_no_owner() {
        let store = InMemoryStore::default();
        let user = owner();
        store.seed_user(user.clone());
        let pet = Pet::builder().name("Stray").build().unwrap();

        let mut session = store.begin().await.unwrap();
        attach_on_create(&mut session, &pet).await.unwrap();
        assert_eq!(session.user_updates(), 0);
    }

    #[tokio::test]
    async fn should_fail_loudly_when_owner_is_missing() {
        let store = InMemoryStore::default();
        let pet = Pet::builder()
            .name("Rex")
            .user_id(UserId::new())
            .build()
            .unwrap();

        let mut session = store.begin().await.unwrap();
        let result = attach_on_create(&mut session, &pet).await;
        assert!(matches!(result, Err(PetHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_tolerate_detaching_a_pet_the_owner_does_not_list() {
        let store = InMemoryStore::default();
        let user = owner();
        store.seed_user(user.clone());
        let pet = Pet::builder().name("Rex").user_id(user.id).build().unwrap();

        let mut session = store.begin().await.unwrap();
        detach_on_delete(&mut session, &pet).await.unwrap();
        assert_eq!(session.user_updates(), 0);
    }

    #[tokio::test]
    async fn should_leave_owners_alone_when_owner_unchanged() {
        let store = InMemoryStore::default();
        let user = owner();
        store.seed_user(user.clone());
        let pet = Pet::builder().name("Rex").user_id(user.id).build().unwrap();
        let mut renamed = pet.clone();
        renamed.name = "Max".to_string();

        let mut session = store.begin().await.unwrap();
        reassign_on_update(&mut session, &pet, &renamed)
            .await
            .unwrap();
        assert_eq!(session.user_updates(), 0);
    }

    #[tokio::test]
    async fn should_delete_nothing_when_user_owns_no_pets() {
        let store = InMemoryStore::default();
        let user = owner();

        let mut session = store.begin().await.unwrap();
        let removed = cascade_delete_on_user_delete(&mut session, &user)
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }
}
