//! Country record.

use super::{require_text, EntityId, ValidationError, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

pub type CountryId = EntityId;

/// Country an owner resides in. One country has many owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    /// Unique across countries, ignoring case and surrounding whitespace.
    pub name: String,
}

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(UNASSIGNED_ID, name)
    }

    pub fn with_id(id: CountryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("country", "name", &self.name)
    }
}
