//! Per-request repository set.
//!
//! # Responsibility
//! - Hand out all six record repositories over one borrowed connection.
//!
//! # Invariants
//! - The schema is checked once, when the set is built.
//! - The set never owns the connection; dropping the caller's connection
//!   releases the store on every exit path.

use super::category_repo::SqliteCategoryRepository;
use super::country_repo::SqliteCountryRepository;
use super::owner_repo::SqliteOwnerRepository;
use super::pokemon_repo::SqlitePokemonRepository;
use super::record_repo::{RepoResult, SqliteRepository};
use super::review_repo::SqliteReviewRepository;
use super::reviewer_repo::SqliteReviewerRepository;
use super::table::ensure_schema_ready;
use rusqlite::Connection;

/// All record repositories sharing one connection.
#[derive(Clone, Copy)]
pub struct Repositories<'conn> {
    conn: &'conn Connection,
}

impl<'conn> Repositories<'conn> {
    /// Builds the set from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }

    pub fn categories(&self) -> SqliteCategoryRepository<'conn> {
        SqliteRepository::from_ready(self.conn)
    }

    pub fn countries(&self) -> SqliteCountryRepository<'conn> {
        SqliteRepository::from_ready(self.conn)
    }

    pub fn owners(&self) -> SqliteOwnerRepository<'conn> {
        SqliteRepository::from_ready(self.conn)
    }

    pub fn pokemon(&self) -> SqlitePokemonRepository<'conn> {
        SqliteRepository::from_ready(self.conn)
    }

    pub fn reviews(&self) -> SqliteReviewRepository<'conn> {
        SqliteRepository::from_ready(self.conn)
    }

    pub fn reviewers(&self) -> SqliteReviewerRepository<'conn> {
        SqliteRepository::from_ready(self.conn)
    }
}
