//! User: a person who may own pets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{PetHubError, ValidationError};
use crate::id::{PetId, UserId};
use crate::time::{Timestamp, Touch, now};

/// A user and the set of pets they own.
///
/// `pet_ids` is the user's side of the ownership relationship. It is kept in
/// sync with [`Pet::user_id`](crate::pet::Pet::user_id) by the application
/// layer; nothing here enforces the other side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub pet_ids: BTreeSet<PetId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::Validation`] when `name` or `email` is empty,
    /// or when `email` has no `local@domain` shape.
    pub fn validate(&self) -> Result<(), PetHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmptyEmail.into());
        }
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ValidationError::InvalidEmail(self.email.clone()).into()),
        }
    }

    /// Record ownership of `pet_id`. Returns `false` if it was already owned.
    pub fn add_pet(&mut self, pet_id: PetId) -> bool {
        self.pet_ids.insert(pet_id)
    }

    /// Drop ownership of `pet_id`. Returns `false` if it was not owned.
    pub fn remove_pet(&mut self, pet_id: PetId) -> bool {
        self.pet_ids.remove(&pet_id)
    }

    #[must_use]
    pub fn owns(&self, pet_id: PetId) -> bool {
        self.pet_ids.contains(&pet_id)
    }
}

impl Touch for User {
    fn updated_at_mut(&mut self) -> &mut Timestamp {
        &mut self.updated_at
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Consume the builder, validate, and return a [`User`] owning no pets.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::Validation`] if `name` or `email` is missing
    /// or malformed.
    pub fn build(self) -> Result<User, PetHubError> {
        let ts = now();
        let user = User {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone,
            pet_ids: BTreeSet::new(),
            created_at: ts,
            updated_at: ts,
        };
        user.validate()?;
        Ok(user)
    }
}

/// Criteria for listing users. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserFilter {
    /// Whether `user` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.name.as_deref().is_none_or(|name| user.name == name)
            && self.email.as_deref().is_none_or(|email| user.email == email)
    }
}
