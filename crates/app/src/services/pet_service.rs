//! Pet service: use-cases for managing pets and keeping owners in sync.

use pethub_domain::error::{NotFoundError, PetHubError};
use pethub_domain::id::PetId;
use pethub_domain::pet::{Pet, PetFilter};
use pethub_domain::time::Touch;

use crate::ports::{PetStore, Session, UnitOfWork};
use crate::services::ownership;

fn not_found(id: PetId) -> PetHubError {
    NotFoundError {
        entity: "Pet",
        id: id.to_string(),
    }
    .into()
}

/// Application service for pet CRUD operations.
///
/// Every mutating operation writes the pet and its owner's pet set within a
/// single session.
pub struct PetService<U> {
    uow: U,
}

impl<U: UnitOfWork> PetService<U> {
    /// Create a new service backed by the given unit of work.
    pub fn new(uow: U) -> Self {
        Self { uow }
    }

    /// Create a new pet and attach it to its owner, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::Validation`] if invariants fail,
    /// [`PetHubError::NotFound`] if the named owner does not exist, or a
    /// storage error. Nothing is persisted on error.
    #[tracing::instrument(skip(self, pet), fields(pet_id = %pet.id, pet_name = %pet.name))]
    pub async fn create_pet(&self, pet: Pet) -> Result<Pet, PetHubError> {
        pet.validate()?;
        let mut session = self.uow.begin().await?;
        session.insert_pet(&pet).await?;
        ownership::attach_on_create(&mut session, &pet).await?;
        session.commit().await?;
        tracing::info!(owner = ?pet.user_id, "pet created");
        Ok(pet)
    }

    /// Look up a pet by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::NotFound`] when no pet with `id` exists,
    /// or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn get_pet(&self, id: PetId) -> Result<Pet, PetHubError> {
        let mut session = self.uow.begin().await?;
        session.find_pet(id).await?.ok_or_else(|| not_found(id))
    }

    /// List pets matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the session.
    pub async fn list_pets(&self, filter: PetFilter) -> Result<Vec<Pet>, PetHubError> {
        let mut session = self.uow.begin().await?;
        session.list_pets(&filter).await
    }

    /// Replace the mutable fields of pet `id` with those of `changes`.
    ///
    /// The identifier and creation time are kept. When the owner changes,
    /// the pet moves from the previous owner's set to the new one.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::NotFound`] when the pet or the new owner does
    /// not exist, [`PetHubError::Validation`] if invariants fail, or a
    /// storage error.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_pet(&self, id: PetId, changes: Pet) -> Result<Pet, PetHubError> {
        let mut session = self.uow.begin().await?;
        let previous = session.find_pet(id).await?.ok_or_else(|| not_found(id))?;
        let mut updated = Pet {
            id,
            created_at: previous.created_at,
            ..changes
        };
        updated.touch();
        updated.validate()?;

        session.update_pet(&updated).await?;
        ownership::reassign_on_update(&mut session, &previous, &updated).await?;
        session.commit().await?;
        Ok(updated)
    }

    /// Delete a pet and detach it from its owner. Returns the deleted pet.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::NotFound`] when no pet with `id` exists
    /// (including a second delete of the same pet), or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_pet(&self, id: PetId) -> Result<Pet, PetHubError> {
        let mut session = self.uow.begin().await?;
        let pet = session.find_pet(id).await?.ok_or_else(|| not_found(id))?;
        if !session.delete_pet(id).await? {
            return Err(not_found(id));
        }
        ownership::detach_on_delete(&mut session, &pet).await?;
        session.commit().await?;
        tracing::info!(owner = ?pet.user_id, "pet deleted");
        Ok(pet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::InMemoryStore;
    use pethub_domain::error::ValidationError;
    use pethub_domain::id::UserId;
    use pethub_domain::user::User;

    fn make_service() -> (PetService<InMemoryStore>, InMemoryStore) {
        let store = InMemoryStore::default();
        (PetService::new(store.clone()), store)
    }

    fn seeded_owner(store: &InMemoryStore, name: &str) -> UserId {
        let user = User::builder()
            .name(name)
            .email(format!("{}@example.com", name.to_lowercase()))
            .build()
            .unwrap();
        let id = user.id;
        store.seed_user(user);
        id
    }

    fn owned_pet(name: &str, owner: UserId) -> Pet {
        Pet::builder().name(name).user_id(owner).build().unwrap()
    }

    #[tokio::test]
    async fn should_add_pet_to_owner_when_created_with_owner() {
        let (svc, store) = make_service();
        let owner = seeded_owner(&store, "Alice");

        let pet = svc.create_pet(owned_pet("Rex", owner)).await.unwrap();

        let user = store.user(owner).unwrap();
        assert_eq!(user.pet_ids.len(), 1);
        assert!(user.owns(pet.id));
        assert_eq!(store.pet(pet.id).unwrap().user_id, Some(owner));
    }

    #[tokio::test]
    async fn should_not_mutate_users_when_created_without_owner() {
        let (svc, store) = make_service();
        let owner = seeded_owner(&store, "Alice");
        let before = store.user(owner).unwrap();

        let pet = svc
            .create_pet(Pet::builder().name("Stray").build().unwrap())
            .await
            .unwrap();

        assert!(store.pet(pet.id).is_some());
        assert_eq!(store.user(owner).unwrap(), before);
    }

    #[tokio::test]
    async fn should_persist_nothing_when_owner_does_not_exist() {
        let (svc, store) = make_service();

        let result = svc.create_pet(owned_pet("Ghost", UserId::new())).await;

        assert!(matches!(result, Err(PetHubError::NotFound(_))));
        assert_eq!(store.pet_count(), 0);
    }

    #[tokio::test]
    async fn should_roll_back_pet_insert_when_owner_update_fails() {
        let (svc, store) = make_service();
        let owner = seeded_owner(&store, "Alice");
        store.fail_user_updates();

        let result = svc.create_pet(owned_pet("Rex", owner)).await;

        assert!(matches!(result, Err(PetHubError::Storage(_))));
        assert_eq!(store.pet_count(), 0);
        assert!(store.user(owner).unwrap().pet_ids.is_empty());
    }

    #[tokio::test]
    async fn should_reject_create_when_name_is_empty() {
        let (svc, _store) = make_service();
        let mut pet = Pet::builder().name("Rex").build().unwrap();
        pet.name = String::new();

        let result = svc.create_pet(pet).await;
        assert!(matches!(
            result,
            Err(PetHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_pet_missing() {
        let (svc, _store) = make_service();
        let result = svc.get_pet(PetId::new()).await;
        assert!(matches!(result, Err(PetHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_pets_by_owner() {
        let (svc, store) = make_service();
        let alice = seeded_owner(&store, "Alice");
        let bob = seeded_owner(&store, "Bob");
        svc.create_pet(owned_pet("Rex", alice)).await.unwrap();
        svc.create_pet(owned_pet("Tom", alice)).await.unwrap();
        svc.create_pet(owned_pet("Kit", bob)).await.unwrap();

        let all = svc.list_pets(PetFilter::default()).await.unwrap();
        let alices = svc
            .list_pets(PetFilter {
                name: None,
                user_id: Some(alice),
            })
            .await
            .unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(alices.len(), 2);
    }

    #[tokio::test]
    async fn should_detach_pet_from_owner_when_deleted() {
        let (svc, store) = make_service();
        let owner = seeded_owner(&store, "Alice");
        let pet = svc.create_pet(owned_pet("Rex", owner)).await.unwrap();

        let deleted = svc.delete_pet(pet.id).await.unwrap();

        assert_eq!(deleted.id, pet.id);
        assert!(store.pet(pet.id).is_none());
        assert!(!store.user(owner).unwrap().owns(pet.id));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_twice() {
        let (svc, store) = make_service();
        let owner = seeded_owner(&store, "Alice");
        let pet = svc.create_pet(owned_pet("Rex", owner)).await.unwrap();
        svc.delete_pet(pet.id).await.unwrap();

        let result = svc.delete_pet(pet.id).await;
        assert!(matches!(result, Err(PetHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_pet_the_owner_never_listed() {
        let (svc, store) = make_service();
        let owner = seeded_owner(&store, "Alice");
        let pet = owned_pet("Rex", owner);
        let id = pet.id;
        store.seed_pet(pet);

        svc.delete_pet(id).await.unwrap();

        assert!(store.pet(id).is_none());
        assert!(store.user(owner).unwrap().pet_ids.is_empty());
    }

    #[tokio::test]
    async fn should_move_pet_between_owners_when_owner_changes() {
        let (svc, store) = make_service();
        let alice = seeded_owner(&store, "Alice");
        let bob = seeded_owner(&store, "Bob");
        let pet = svc.create_pet(owned_pet("Rex", alice)).await.unwrap();

        let updated = svc
            .update_pet(pet.id, owned_pet("Rex", bob))
            .await
            .unwrap();

        assert_eq!(updated.id, pet.id);
        assert_eq!(updated.created_at, pet.created_at);
        assert_eq!(updated.user_id, Some(bob));
        assert!(!store.user(alice).unwrap().owns(pet.id));
        assert!(store.user(bob).unwrap().owns(pet.id));
    }

    #[tokio::test]
    async fn should_detach_pet_when_update_clears_owner() {
        let (svc, store) = make_service();
        let alice = seeded_owner(&store, "Alice");
        let pet = svc.create_pet(owned_pet("Rex", alice)).await.unwrap();

        let updated = svc
            .update_pet(pet.id, Pet::builder().name("Rex").build().unwrap())
            .await
            .unwrap();

        assert!(updated.user_id.is_none());
        assert!(store.user(alice).unwrap().pet_ids.is_empty());
    }

    #[tokio::test]
    async fn should_keep_pet_unchanged_when_new_owner_missing() {
        let (svc, store) = make_service();
        let alice = seeded_owner(&store, "Alice");
        let pet = svc.create_pet(owned_pet("Rex", alice)).await.unwrap();

        let result = svc
            .update_pet(pet.id, owned_pet("Rex", UserId::new()))
            .await;

        assert!(matches!(result, Err(PetHubError::NotFound(_))));
        assert_eq!(store.pet(pet.id).unwrap().user_id, Some(alice));
        assert!(store.user(alice).unwrap().owns(pet.id));
    }
}
