//! Owner table mapping and owner/pokemon traversals.
//!
//! # Invariants
//! - Create and update resolve `country_id` inside the write transaction.
//! - Owner/pokemon traversals go through `pokemon_owners` only.

use super::pokemon_repo::POKEMON_JOIN_COLUMNS;
use super::record_repo::{RepoResult, Repository, SqliteRepository};
use super::table::{query_records, Reference, Table};
use crate::model::country::Country;
use crate::model::owner::{Owner, OwnerId};
use crate::model::pokemon::{Pokemon, PokemonId};
use crate::model::{EntityId, ValidationError};
use rusqlite::{params, Connection, Row};

pub(crate) const OWNER_COLUMNS: &str = "id, first_name, last_name, country_id";

impl Table for Owner {
    const ENTITY: &'static str = "owner";
    const TABLE: &'static str = "owners";
    const COLUMNS: &'static str = OWNER_COLUMNS;
    const UNIQUE_COLUMN: &'static str = "last_name";

    type Draft = Owner;

    fn id(&self) -> EntityId {
        self.id
    }

    fn draft_record(draft: &Owner) -> &Owner {
        draft
    }

    fn unique_key(&self) -> &str {
        &self.last_name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Owner::validate(self)
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::to::<Country>(self.country_id)]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            country_id: row.get("country_id")?,
        })
    }

    fn insert(conn: &Connection, draft: &Owner) -> RepoResult<EntityId> {
        conn.execute(
            "INSERT INTO owners (first_name, last_name, country_id) VALUES (?1, ?2, ?3);",
            params![draft.first_name, draft.last_name, draft.country_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE owners
             SET first_name = ?2,
                 last_name = ?3,
                 country_id = ?4
             WHERE id = ?1;",
            params![self.id, self.first_name, self.last_name, self.country_id],
        )?)
    }
}

/// Owner repository: generic record operations plus pokemon traversals.
pub trait OwnerRepository: Repository<Entity = Owner> {
    /// Pokemon held by `owner_id`.
    fn pokemon_by_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Pokemon>>;
    /// Owners holding `pokemon_id`.
    fn owners_of_pokemon(&self, pokemon_id: PokemonId) -> RepoResult<Vec<Owner>>;
}

pub type SqliteOwnerRepository<'conn> = SqliteRepository<'conn, Owner>;

impl OwnerRepository for SqliteOwnerRepository<'_> {
    fn pokemon_by_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Pokemon>> {
        query_records(
            self.conn(),
            &format!(
                "SELECT {POKEMON_JOIN_COLUMNS}
                 FROM pokemon p
                 INNER JOIN pokemon_owners po ON po.pokemon_id = p.id
                 WHERE po.owner_id = ?1
                 ORDER BY p.id ASC;"
            ),
            [owner_id],
        )
    }

    fn owners_of_pokemon(&self, pokemon_id: PokemonId) -> RepoResult<Vec<Owner>> {
        query_records(
            self.conn(),
            "SELECT
                o.id AS id,
                o.first_name AS first_name,
                o.last_name AS last_name,
                o.country_id AS country_id
             FROM owners o
             INNER JOIN pokemon_owners po ON po.owner_id = o.id
             WHERE po.pokemon_id = ?1
             ORDER BY o.id ASC;",
            [pokemon_id],
        )
    }
}
