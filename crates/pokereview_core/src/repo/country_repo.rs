//! Country table mapping and country traversals.

use super::owner_repo::OWNER_COLUMNS;
use super::record_repo::{RepoResult, Repository, SqliteRepository};
use super::table::{query_record, query_records, Table};
use crate::model::country::{Country, CountryId};
use crate::model::owner::{Owner, OwnerId};
use crate::model::{EntityId, ValidationError};
use rusqlite::{params, Connection, Row};

impl Table for Country {
    const ENTITY: &'static str = "country";
    const TABLE: &'static str = "countries";
    const COLUMNS: &'static str = "id, name";
    const UNIQUE_COLUMN: &'static str = "name";

    type Draft = Country;

    fn id(&self) -> EntityId {
        self.id
    }

    fn draft_record(draft: &Country) -> &Country {
        draft
    }

    fn unique_key(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Country::validate(self)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self::with_id(row.get("id")?, row.get::<_, String>("name")?))
    }

    fn insert(conn: &Connection, draft: &Country) -> RepoResult<EntityId> {
        conn.execute(
            "INSERT INTO countries (name) VALUES (?1);",
            [draft.name.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE countries SET name = ?2 WHERE id = ?1;",
            params![self.id, self.name],
        )?)
    }
}

/// Country repository: generic record operations plus owner traversals.
pub trait CountryRepository: Repository<Entity = Country> {
    /// Country the owner lives in; `None` for an unknown owner.
    fn country_by_owner(&self, owner_id: OwnerId) -> RepoResult<Option<Country>>;
    /// Owners living in `country_id`.
    fn owners_by_country(&self, country_id: CountryId) -> RepoResult<Vec<Owner>>;
}

pub type SqliteCountryRepository<'conn> = SqliteRepository<'conn, Country>;

impl CountryRepository for SqliteCountryRepository<'_> {
    fn country_by_owner(&self, owner_id: OwnerId) -> RepoResult<Option<Country>> {
        query_record(
            self.conn(),
            "SELECT c.id AS id, c.name AS name
             FROM countries c
             INNER JOIN owners o ON o.country_id = c.id
             WHERE o.id = ?1;",
            [owner_id],
        )
    }

    fn owners_by_country(&self, country_id: CountryId) -> RepoResult<Vec<Owner>> {
        query_records(
            self.conn(),
            &format!(
                "SELECT {OWNER_COLUMNS}
                 FROM owners
                 WHERE country_id = ?1
                 ORDER BY id ASC;"
            ),
            [country_id],
        )
    }
}
