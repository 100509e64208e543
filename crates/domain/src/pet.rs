//! Pet: an animal record, optionally owned by a [`User`](crate::user::User).

use serde::{Deserialize, Serialize};

use crate::error::{PetHubError, ValidationError};
use crate::id::{PetId, UserId};
use crate::time::{Timestamp, Touch, now};

/// A pet. The owner is referenced by id only; the owner's side of the
/// relationship lives in [`User::pet_ids`](crate::user::User::pet_ids).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub species: Option<String>,
    pub user_id: Option<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Pet {
    /// Create a builder for constructing a [`Pet`].
    #[must_use]
    pub fn builder() -> PetBuilder {
        PetBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), PetHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Whether the pet references an owning user.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.user_id.is_some()
    }

    /// Whether the pet is owned by `user_id`.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == Some(user_id)
    }
}

impl Touch for Pet {
    fn updated_at_mut(&mut self) -> &mut Timestamp {
        &mut self.updated_at
    }
}

/// Step-by-step builder for [`Pet`].
#[derive(Debug, Default)]
pub struct PetBuilder {
    id: Option<PetId>,
    name: Option<String>,
    species: Option<String>,
    user_id: Option<UserId>,
}

impl PetBuilder {
    #[must_use]
    pub fn id(mut self, id: PetId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Consume the builder, validate, and return a [`Pet`].
    ///
    /// # Errors
    ///
    /// Returns [`PetHubError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Pet, PetHubError> {
        let ts = now();
        let pet = Pet {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            species: self.species,
            user_id: self.user_id,
            created_at: ts,
            updated_at: ts,
        };
        pet.validate()?;
        Ok(pet)
    }
}

/// Criteria for listing pets. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetFilter {
    pub name: Option<String>,
    pub user_id: Option<UserId>,
}

impl PetFilter {
    /// Whether `pet` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, pet: &Pet) -> bool {
        self.name.as_deref().is_none_or(|name| pet.name == name)
            && self.user_id.is_none_or(|user_id| pet.is_owned_by(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_pet_when_name_provided() {
        let pet = Pet::builder().name("Rex").species("dog").build().unwrap();
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.species.as_deref(), Some("dog"));
        assert!(!pet.is_owned());
        assert_eq!(pet.created_at, pet.updated_at);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Pet::builder().build();
        assert!(matches!(
            result,
            Err(PetHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_name_is_blank() {
        let result = Pet::builder().name("   ").build();
        assert!(matches!(
            result,
            Err(PetHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_report_owner_when_user_id_set() {
        let owner = UserId::new();
        let pet = Pet::builder().name("Tom").user_id(owner).build().unwrap();
        assert!(pet.is_owned());
        assert!(pet.is_owned_by(owner));
        assert!(!pet.is_owned_by(UserId::new()));
    }

    #[test]
    fn should_match_everything_with_empty_filter() {
        let pet = Pet::builder().name("Tom").build().unwrap();
        assert!(PetFilter::default().matches(&pet));
    }

    #[test]
    fn should_match_on_name_and_owner() {
        let owner = UserId::new();
        let pet = Pet::builder().name("Tom").user_id(owner).build().unwrap();

        let by_name = PetFilter {
            name: Some("Tom".to_string()),
            user_id: None,
        };
        let by_both = PetFilter {
            name: Some("Tom".to_string()),
            user_id: Some(owner),
        };
        let wrong_owner = PetFilter {
            name: Some("Tom".to_string()),
            user_id: Some(UserId::new()),
        };

        assert!(by_name.matches(&pet));
        assert!(by_both.matches(&pet));
        assert!(!wrong_owner.matches(&pet));
    }
}
