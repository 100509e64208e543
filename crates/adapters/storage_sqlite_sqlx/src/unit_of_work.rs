//! `SQLite` implementation of [`UnitOfWork`]: one session is one transaction.

use sqlx::{Sqlite, SqlitePool, Transaction};

use pethub_app::ports::{PetStore, Session, UnitOfWork, UserStore};
use pethub_domain::error::PetHubError;
use pethub_domain::id::{PetId, UserId};
use pethub_domain::pet::{Pet, PetFilter};
use pethub_domain::user::{User, UserFilter};

use crate::error::StorageError;
use crate::{pet_repo, user_repo};

/// `SQLite`-backed unit of work. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct SqliteUnitOfWork {
    pool: SqlitePool,
}

impl SqliteUnitOfWork {
    /// Create a new unit of work using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UnitOfWork for SqliteUnitOfWork {
    type Session = SqliteSession;

    /// Open a session holding the database write lock. Concurrent sessions
    /// wait on the busy timeout until the lock is released.
    async fn begin(&self) -> Result<SqliteSession, PetHubError> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(StorageError::from)?;
        Ok(SqliteSession { tx })
    }
}

/// An open `SQLite` transaction. Dropping it without [`Session::commit`]
/// rolls every write back.
pub struct SqliteSession {
    tx: Transaction<'static, Sqlite>,
}

impl PetStore for SqliteSession {
    async fn insert_pet(&mut self, pet: &Pet) -> Result<(), PetHubError> {
        pet_repo::insert(&mut self.tx, pet)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn find_pet(&mut self, id: PetId) -> Result<Option<Pet>, PetHubError> {
        Ok(pet_repo::find(&mut self.tx, id)
            .await
            .map_err(StorageError::from)?)
    }

    async fn list_pets(&mut self, filter: &PetFilter) -> Result<Vec<Pet>, PetHubError> {
        Ok(pet_repo::list(&mut self.tx, filter)
            .await
            .map_err(StorageError::from)?)
    }

    async fn update_pet(&mut self, pet: &Pet) -> Result<(), PetHubError> {
        pet_repo::update(&mut self.tx, pet)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn delete_pet(&mut self, id: PetId) -> Result<bool, PetHubError> {
        Ok(pet_repo::delete(&mut self.tx, id)
            .await
            .map_err(StorageError::from)?)
    }

    async fn delete_pets(&mut self, ids: &[PetId]) -> Result<u64, PetHubError> {
        Ok(pet_repo::delete_many(&mut self.tx, ids)
            .await
            .map_err(StorageError::from)?)
    }
}

impl UserStore for SqliteSession {
    async fn insert_user(&mut self, user: &User) -> Result<(), PetHubError> {
        user_repo::insert(&mut self.tx, user)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, PetHubError> {
        Ok(user_repo::find(&mut self.tx, id)
            .await
            .map_err(StorageError::from)?)
    }

    async fn list_users(&mut self, filter: &UserFilter) -> Result<Vec<User>, PetHubError> {
        Ok(user_repo::list(&mut self.tx, filter)
            .await
            .map_err(StorageError::from)?)
    }

    async fn update_user(&mut self, user: &User) -> Result<(), PetHubError> {
        user_repo::update(&mut self.tx, user)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn delete_user(&mut self, id: UserId) -> Result<bool, PetHubError> {
        Ok(user_repo::delete(&mut self.tx, id)
            .await
            .map_err(StorageError::from)?)
    }
}

impl Session for SqliteSession {
    async fn commit(self) -> Result<(), PetHubError> {
        self.tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }
}
