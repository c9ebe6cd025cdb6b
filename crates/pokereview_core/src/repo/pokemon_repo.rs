//! Pokemon table mapping and junction-row maintenance.
//!
//! # Responsibility
//! - Create a pokemon together with its owner and category links.
//! - Rebuild those links when associations are replaced.
//! - Aggregate review ratings per pokemon.
//!
//! # Invariants
//! - The pokemon row and its junction rows commit or roll back as a unit;
//!   no orphan link survives a failed write.
//! - After `update_with_associations` the pokemon has exactly the supplied
//!   owner and category links.
//! - The generic `update` never touches junction rows.

use super::record_repo::{log_write_failure, RepoError, RepoResult, Repository, SqliteRepository};
use super::table::{ensure_reference, normalize_unique_key, Reference, Table};
use crate::model::category::{Category, CategoryId};
use crate::model::owner::{Owner, OwnerId};
use crate::model::pokemon::{Pokemon, PokemonDraft, PokemonId};
use crate::model::{EntityId, ValidationError};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

/// Pokemon select list for queries joining `pokemon p` to a junction table.
pub(crate) const POKEMON_JOIN_COLUMNS: &str =
    "p.id AS id, p.name AS name, p.birth_date AS birth_date";

impl Table for Pokemon {
    const ENTITY: &'static str = "pokemon";
    const TABLE: &'static str = "pokemon";
    const COLUMNS: &'static str = "id, name, birth_date";
    const UNIQUE_COLUMN: &'static str = "name";

    type Draft = PokemonDraft;

    fn id(&self) -> EntityId {
        self.id
    }

    fn draft_record(draft: &PokemonDraft) -> &Pokemon {
        &draft.pokemon
    }

    fn unique_key(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Pokemon::validate(self)
    }

    fn draft_references(draft: &PokemonDraft) -> Vec<Reference> {
        vec![
            Reference::to::<Owner>(draft.owner_id),
            Reference::to::<Category>(draft.category_id),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self::with_id(
            row.get("id")?,
            row.get::<_, String>("name")?,
            row.get("birth_date")?,
        ))
    }

    fn insert(conn: &Connection, draft: &PokemonDraft) -> RepoResult<EntityId> {
        conn.execute(
            "INSERT INTO pokemon (name, birth_date) VALUES (?1, ?2);",
            params![draft.pokemon.name, draft.pokemon.birth_date],
        )?;
        let pokemon_id = conn.last_insert_rowid();
        link_pokemon(conn, pokemon_id, draft.owner_id, draft.category_id)?;
        Ok(pokemon_id)
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE pokemon SET name = ?2, birth_date = ?3 WHERE id = ?1;",
            params![self.id, self.name, self.birth_date],
        )?)
    }
}

/// Pokemon repository: generic record operations plus name lookup, rating
/// and association replacement.
pub trait PokemonRepository: Repository<Entity = Pokemon> {
    /// Looks a pokemon up by name, ignoring case and surrounding whitespace.
    fn get_by_name(&self, name: &str) -> RepoResult<Option<Pokemon>>;
    /// Mean review rating; `0.0` when the pokemon has no reviews.
    fn rating(&self, pokemon_id: PokemonId) -> RepoResult<f64>;
    /// Replaces the record and its owner/category links in one transaction.
    fn update_with_associations(
        &self,
        owner_id: OwnerId,
        category_id: CategoryId,
        pokemon: &Pokemon,
    ) -> RepoResult<()>;
}

pub type SqlitePokemonRepository<'conn> = SqliteRepository<'conn, Pokemon>;

impl PokemonRepository for SqlitePokemonRepository<'_> {
    fn get_by_name(&self, name: &str) -> RepoResult<Option<Pokemon>> {
        let wanted = normalize_unique_key(name);
        Ok(self
            .get_all()?
            .into_iter()
            .find(|pokemon| normalize_unique_key(&pokemon.name) == wanted))
    }

    fn rating(&self, pokemon_id: PokemonId) -> RepoResult<f64> {
        let average: Option<f64> = self.conn().query_row(
            "SELECT AVG(rating) FROM reviews WHERE pokemon_id = ?1;",
            [pokemon_id],
            |row| row.get(0),
        )?;
        Ok(average.unwrap_or(0.0))
    }

    fn update_with_associations(
        &self,
        owner_id: OwnerId,
        category_id: CategoryId,
        pokemon: &Pokemon,
    ) -> RepoResult<()> {
        replace_associations(self.conn(), owner_id, category_id, pokemon)
            .inspect_err(|err| log_write_failure("update_links", Pokemon::ENTITY, err))?;
        debug!(
            "event=record_write module=repo status=ok op=update_links entity=pokemon id={}",
            pokemon.id
        );
        Ok(())
    }
}

fn replace_associations(
    conn: &Connection,
    owner_id: OwnerId,
    category_id: CategoryId,
    pokemon: &Pokemon,
) -> RepoResult<()> {
    pokemon.validate()?;

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    ensure_reference(&tx, &Reference::to::<Owner>(owner_id))?;
    ensure_reference(&tx, &Reference::to::<Category>(category_id))?;
    if pokemon.update_row(&tx)? == 0 {
        return Err(RepoError::NotFound {
            entity: Pokemon::ENTITY,
            id: pokemon.id,
        });
    }

    tx.execute(
        "DELETE FROM pokemon_owners WHERE pokemon_id = ?1;",
        [pokemon.id],
    )?;
    tx.execute(
        "DELETE FROM pokemon_categories WHERE pokemon_id = ?1;",
        [pokemon.id],
    )?;
    link_pokemon(&tx, pokemon.id, owner_id, category_id)?;

    tx.commit()?;
    Ok(())
}

fn link_pokemon(
    conn: &Connection,
    pokemon_id: PokemonId,
    owner_id: OwnerId,
    category_id: CategoryId,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO pokemon_owners (pokemon_id, owner_id) VALUES (?1, ?2);",
        params![pokemon_id, owner_id],
    )?;
    conn.execute(
        "INSERT INTO pokemon_categories (pokemon_id, category_id) VALUES (?1, ?2);",
        params![pokemon_id, category_id],
    )?;
    Ok(())
}
