//! Review record.
//!
//! # Invariants
//! - `pokemon_id` and `reviewer_id` are resolved before the row is written;
//!   a review never points at a missing pokemon or reviewer.

use super::pokemon::PokemonId;
use super::reviewer::ReviewerId;
use super::{require_text, EntityId, ValidationError, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

pub type ReviewId = EntityId;

/// A reviewer's rating of one pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    /// Unique across reviews, ignoring case and surrounding whitespace.
    pub title: String,
    pub text: String,
    pub rating: i32,
    pub pokemon_id: PokemonId,
    pub reviewer_id: ReviewerId,
}

impl Review {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        rating: i32,
        pokemon_id: PokemonId,
        reviewer_id: ReviewerId,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: title.into(),
            text: text.into(),
            rating,
            pokemon_id,
            reviewer_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("review", "title", &self.title)?;
        require_text("review", "text", &self.text)
    }
}
