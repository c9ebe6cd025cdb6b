//! Pokemon record and its create draft.
//!
//! # Invariants
//! - A pokemon is created together with one owner link and one category
//!   link; the three rows commit or roll back as a unit.
//! - `birth_date` is Unix epoch milliseconds.

use super::category::CategoryId;
use super::owner::OwnerId;
use super::{require_text, EntityId, ValidationError, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

pub type PokemonId = EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    /// Unique across pokemon, ignoring case and surrounding whitespace.
    pub name: String,
    pub birth_date: i64,
}

impl Pokemon {
    pub fn new(name: impl Into<String>, birth_date: i64) -> Self {
        Self::with_id(UNASSIGNED_ID, name, birth_date)
    }

    pub fn with_id(id: PokemonId, name: impl Into<String>, birth_date: i64) -> Self {
        Self {
            id,
            name: name.into(),
            birth_date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("pokemon", "name", &self.name)
    }
}

/// Create input for a pokemon: the record plus the owner and category it is
/// linked to from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonDraft {
    pub pokemon: Pokemon,
    pub owner_id: OwnerId,
    pub category_id: CategoryId,
}

impl PokemonDraft {
    pub fn new(pokemon: Pokemon, owner_id: OwnerId, category_id: CategoryId) -> Self {
        Self {
            pokemon,
            owner_id,
            category_id,
        }
    }
}
