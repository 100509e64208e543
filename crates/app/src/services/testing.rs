//! In-memory unit of work shared by the service tests.
//!
//! A session works on a private copy of the committed tables and swaps it in
//! on commit, so dropping a session discards its writes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use pethub_domain::error::PetHubError;
use pethub_domain::id::{PetId, UserId};
use pethub_domain::pet::{Pet, PetFilter};
use pethub_domain::user::{User, UserFilter};

use crate::ports::{PetStore, Session, UnitOfWork, UserStore};

#[derive(Debug, Clone, Default)]
struct Tables {
    pets: BTreeMap<PetId, Pet>,
    users: BTreeMap<UserId, User>,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    committed: Arc<Mutex<Tables>>,
    fail_user_updates: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub(crate) fn seed_user(&self, user: User) {
        self.committed.lock().unwrap().users.insert(user.id, user);
    }

    pub(crate) fn seed_pet(&self, pet: Pet) {
        self.committed.lock().unwrap().pets.insert(pet.id, pet);
    }

    pub(crate) fn pet(&self, id: PetId) -> Option<Pet> {
        self.committed.lock().unwrap().pets.get(&id).cloned()
    }

    pub(crate) fn user(&self, id: UserId) -> Option<User> {
        self.committed.lock().unwrap().users.get(&id).cloned()
    }

    pub(crate) fn pet_count(&self) -> usize {
        self.committed.lock().unwrap().pets.len()
    }

    /// Make every later `update_user` call fail with a storage error.
    pub(crate) fn fail_user_updates(&self) {
        self.fail_user_updates.store(true, Ordering::SeqCst);
    }
}

pub(crate) struct InMemorySession {
    working: Tables,
    committed: Arc<Mutex<Tables>>,
    fail_user_updates: bool,
    user_updates: usize,
}

impl InMemorySession {
    pub(crate) fn working_user(&self, id: UserId) -> Option<&User> {
        self.working.users.get(&id)
    }

    pub(crate) fn user_updates(&self) -> usize {
        self.user_updates
    }
}

impl UnitOfWork for InMemoryStore {
    type Session = InMemorySession;

    async fn begin(&self) -> Result<InMemorySession, PetHubError> {
        let working = self.committed.lock().unwrap().clone();
        Ok(InMemorySession {
            working,
            committed: Arc::clone(&self.committed),
            fail_user_updates: self.fail_user_updates.load(Ordering::SeqCst),
            user_updates: 0,
        })
    }
}

impl PetStore for InMemorySession {
    async fn insert_pet(&mut self, pet: &Pet) -> Result<(), PetHubError> {
        self.working.pets.insert(pet.id, pet.clone());
        Ok(())
    }

    async fn find_pet(&mut self, id: PetId) -> Result<Option<Pet>, PetHubError> {
        Ok(self.working.pets.get(&id).cloned())
    }

    async fn list_pets(&mut self, filter: &PetFilter) -> Result<Vec<Pet>, PetHubError> {
        Ok(self
            .working
            .pets
            .values()
            .filter(|pet| filter.matches(pet))
            .cloned()
            .collect())
    }

    async fn update_pet(&mut self, pet: &Pet) -> Result<(), PetHubError> {
        self.working.pets.insert(pet.id, pet.clone());
        Ok(())
    }

    async fn delete_pet(&mut self, id: PetId) -> Result<bool, PetHubError> {
        Ok(self.working.pets.remove(&id).is_some())
    }

    async fn delete_pets(&mut self, ids: &[PetId]) -> Result<u64, PetHubError> {
        let mut removed = 0;
        for id in ids {
            if self.working.pets.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl UserStore for InMemorySession {
    async fn insert_user(&mut self, user: &User) -> Result<(), PetHubError> {
        self.working.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, PetHubError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn list_users(&mut self, filter: &UserFilter) -> Result<Vec<User>, PetHubError> {
        Ok(self
            .working
            .users
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect())
    }

    async fn update_user(&mut self, user: &User) -> Result<(), PetHubError> {
        if self.fail_user_updates {
            return Err(PetHubError::Storage(Box::new(std::io::Error::other(
                "injected user update failure",
            ))));
        }
        self.user_updates += 1;
        self.working.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&mut self, id: UserId) -> Result<bool, PetHubError> {
        Ok(self.working.users.remove(&id).is_some())
    }
}

impl Session for InMemorySession {
    async fn commit(self) -> Result<(), PetHubError> {
        *self.committed.lock().unwrap() = self.working;
        Ok(())
    }
}
