//! Row mapping and SQL helpers shared by every record repository.
//!
//! # Responsibility
//! - Describe how one record type maps onto its table (`Table`).
//! - Implement the uniqueness precondition and reference resolution once.
//!
//! # Invariants
//! - Uniqueness compares `trim()` + lowercase on both sides against every
//!   row of the table, read on the caller's connection or transaction.
//! - A missing reference is reported as `DanglingReference`, never as a
//!   foreign-key storage error.

use super::record_repo::{RepoError, RepoResult};
use crate::db::migrations::latest_version;
use crate::model::{EntityId, ValidationError};
use rusqlite::{Connection, Params, Row};

const RECORD_TABLES: &[&str] = &[
    "categories",
    "countries",
    "owners",
    "pokemon",
    "reviewers",
    "reviews",
    "pokemon_categories",
    "pokemon_owners",
];

/// Mapping between one record type and its SQLite table.
pub trait Table: Sized {
    /// Singular label used in errors and log events.
    const ENTITY: &'static str;
    const TABLE: &'static str;
    /// Select list for plain single-table reads.
    const COLUMNS: &'static str;
    /// Column holding the identifying text for the uniqueness precondition.
    const UNIQUE_COLUMN: &'static str;

    /// Create input. The record itself unless creation needs extra links.
    type Draft;

    fn id(&self) -> EntityId;
    fn draft_record(draft: &Self::Draft) -> &Self;
    fn unique_key(&self) -> &str;
    fn validate(&self) -> Result<(), ValidationError>;

    /// Foreign keys carried by the record, resolved on create and update.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// Rows that must exist before `draft` is inserted.
    fn draft_references(draft: &Self::Draft) -> Vec<Reference> {
        Self::draft_record(draft).references()
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self>;

    /// Inserts `draft` (and any rows it owns) and returns the new id.
    fn insert(conn: &Connection, draft: &Self::Draft) -> RepoResult<EntityId>;

    /// Writes every mutable column keyed by `self.id()`; returns rows changed.
    fn update_row(&self, conn: &Connection) -> RepoResult<usize>;
}

/// A foreign key that must resolve to an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub entity: &'static str,
    pub table: &'static str,
    pub id: EntityId,
}

impl Reference {
    pub fn to<E: Table>(id: EntityId) -> Self {
        Self {
            entity: E::ENTITY,
            table: E::TABLE,
            id,
        }
    }
}

/// Normalizes an identifying value for uniqueness comparison.
pub fn normalize_unique_key(value: &str) -> String {
    value.trim().to_lowercase()
}

pub(crate) fn ensure_unique<E: Table>(conn: &Connection, key: &str) -> RepoResult<()> {
    let wanted = normalize_unique_key(key);
    let mut stmt = conn.prepare(&format!("SELECT {} FROM {};", E::UNIQUE_COLUMN, E::TABLE))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let existing: String = row.get(0)?;
        if normalize_unique_key(&existing) == wanted {
            return Err(RepoError::Duplicate {
                entity: E::ENTITY,
                key: key.trim().to_string(),
            });
        }
    }
    Ok(())
}

pub(crate) fn ensure_reference(conn: &Connection, reference: &Reference) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);",
            reference.table
        ),
        [reference.id],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::DanglingReference {
            entity: reference.entity,
            id: reference.id,
        });
    }
    Ok(())
}

pub(crate) fn query_records<E: Table, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> RepoResult<Vec<E>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(E::from_row(row)?);
    }
    Ok(records)
}

pub(crate) fn query_record<E: Table, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> RepoResult<Option<E>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(E::from_row(row)?)),
        None => Ok(None),
    }
}

pub(crate) fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in RECORD_TABLES {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}
