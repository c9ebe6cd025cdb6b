//! Record types for the pokemon review domain.
//!
//! # Responsibility
//! - Define the six persisted records and the pokemon create draft.
//! - Validate required text fields before any write reaches storage.
//!
//! # Invariants
//! - Ids are storage-assigned surrogate keys; `UNASSIGNED_ID` marks a record
//!   that has not been created yet.
//! - Relationships are carried as foreign-key ids, never as nested records.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod country;
pub mod owner;
pub mod pokemon;
pub mod review;
pub mod reviewer;

/// Surrogate key shared by every record table.
pub type EntityId = i64;

/// Id carried by records built in memory before `create` assigns one.
pub const UNASSIGNED_ID: EntityId = 0;

/// A required text field was empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub entity: &'static str,
    pub field: &'static str,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} must not be blank", self.entity, self.field)
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError { entity, field });
    }
    Ok(())
}
