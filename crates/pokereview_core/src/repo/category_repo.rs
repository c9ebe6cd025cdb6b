//! Category table mapping and category traversals.
//!
//! # Invariants
//! - `pokemon_by_category` resolves through `pokemon_categories` only; a
//!   category with no links yields an empty list.

use super::pokemon_repo::POKEMON_JOIN_COLUMNS;
use super::record_repo::{RepoResult, Repository, SqliteRepository};
use super::table::{query_records, Table};
use crate::model::category::{Category, CategoryId};
use crate::model::pokemon::Pokemon;
use crate::model::{EntityId, ValidationError};
use rusqlite::{params, Connection, Row};

impl Table for Category {
    const ENTITY: &'static str = "category";
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static str = "id, name";
    const UNIQUE_COLUMN: &'static str = "name";

    type Draft = Category;

    fn id(&self) -> EntityId {
        self.id
    }

    fn draft_record(draft: &Category) -> &Category {
        draft
    }

    fn unique_key(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Category::validate(self)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self::with_id(row.get("id")?, row.get::<_, String>("name")?))
    }

    fn insert(conn: &Connection, draft: &Category) -> RepoResult<EntityId> {
        conn.execute(
            "INSERT INTO categories (name) VALUES (?1);",
            [draft.name.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE categories SET name = ?2 WHERE id = ?1;",
            params![self.id, self.name],
        )?)
    }
}

/// Category repository: generic record operations plus pokemon lookup.
pub trait CategoryRepository: Repository<Entity = Category> {
    /// Pokemon linked to `category_id` through junction rows.
    fn pokemon_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Pokemon>>;
}

pub type SqliteCategoryRepository<'conn> = SqliteRepository<'conn, Category>;

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn pokemon_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Pokemon>> {
        query_records(
            self.conn(),
            &format!(
                "SELECT {POKEMON_JOIN_COLUMNS}
                 FROM pokemon p
                 INNER JOIN pokemon_categories pc ON pc.pokemon_id = p.id
                 WHERE pc.category_id = ?1
                 ORDER BY p.id ASC;"
            ),
            [category_id],
        )
    }
}
