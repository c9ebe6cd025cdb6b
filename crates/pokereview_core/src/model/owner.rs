//! Owner record.
//!
//! # Invariants
//! - `country_id` must reference an existing country when the owner is
//!   created or updated.
//! - `last_name` is the identifying field for the uniqueness precondition.

use super::country::CountryId;
use super::{require_text, EntityId, ValidationError, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

pub type OwnerId = EntityId;

/// A pokemon owner living in exactly one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub first_name: String,
    pub last_name: String,
    pub country_id: CountryId,
}

impl Owner {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        country_id: CountryId,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            country_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("owner", "first_name", &self.first_name)?;
        require_text("owner", "last_name", &self.last_name)
    }
}
