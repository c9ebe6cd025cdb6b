//! Core record-keeping logic for pokemon, their categories, owners,
//! countries and reviews.
//! This crate owns every referential and uniqueness invariant.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::country::{Country, CountryId};
pub use model::owner::{Owner, OwnerId};
pub use model::pokemon::{Pokemon, PokemonDraft, PokemonId};
pub use model::review::{Review, ReviewId};
pub use model::reviewer::{Reviewer, ReviewerId};
pub use model::{EntityId, ValidationError, UNASSIGNED_ID};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::country_repo::{CountryRepository, SqliteCountryRepository};
pub use repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
pub use repo::pokemon_repo::{PokemonRepository, SqlitePokemonRepository};
pub use repo::record_repo::{RepoError, RepoResult, Repository, SqliteRepository};
pub use repo::repositories::Repositories;
pub use repo::review_repo::{ReviewRepository, SqliteReviewRepository};
pub use repo::reviewer_repo::{ReviewerRepository, SqliteReviewerRepository};
pub use repo::table::{normalize_unique_key, Reference, Table};
pub use service::record_service::{RecordService, ServiceError, ServiceResult};

/// Minimal health-check API for smoke probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
