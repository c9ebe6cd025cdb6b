//! Category (pokemon type) record.

use super::{require_text, EntityId, ValidationError, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

pub type CategoryId = EntityId;

/// A pokemon category such as "Fire" or "Water".
///
/// Linked to pokemon through `pokemon_categories` junction rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Unique across categories, ignoring case and surrounding whitespace.
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(UNASSIGNED_ID, name)
    }

    pub fn with_id(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("category", "name", &self.name)
    }
}
