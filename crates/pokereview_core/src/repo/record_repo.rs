//! Generic record repository contract and its SQLite implementation.
//!
//! # Responsibility
//! - Provide the uniform capability set (exists/get/create/update/delete)
//!   for every record table through one generic implementation.
//! - Translate storage failures into `RepoError` without exposing engine
//!   detail through `Display`.
//!
//! # Invariants
//! - `create` validates, checks uniqueness, resolves references and inserts
//!   inside one `IMMEDIATE` transaction; a rejected create writes nothing.
//! - `update` and `delete` report `NotFound` when no row matched.

use super::table::{
    ensure_reference, ensure_schema_ready, ensure_unique, query_record, query_records, Table,
};
use crate::db::DbError;
use crate::model::{EntityId, ValidationError};
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all record repositories.
#[derive(Debug)]
pub enum RepoError {
    /// A required field failed record validation.
    Validation(ValidationError),
    /// Storage-level failure. Detail is only reachable through `source()`.
    Db(DbError),
    /// Update or delete matched no row.
    NotFound { entity: &'static str, id: EntityId },
    /// Identifying field collides with an existing row of the same type.
    Duplicate { entity: &'static str, key: String },
    /// A referenced row does not exist.
    DanglingReference { entity: &'static str, id: EntityId },
    /// Persisted row cannot be converted into a record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Db(_) => "persistence_failed",
            Self::NotFound { .. } => "not_found",
            Self::Duplicate { .. } => "duplicate",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::InvalidData(_) => "invalid_data",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(_) => write!(f, "persistence failure"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Duplicate { entity, key } => write!(f, "{entity} `{key}` already exists"),
            Self::DanglingReference { entity, id } => {
                write!(f, "referenced {entity} does not exist: {id}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "record repositories require schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "record repositories require table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Uniform capability set for one record type.
///
/// Relationship traversals live on per-record traits that extend this one.
pub trait Repository {
    type Entity: Table;

    /// True iff a row with `id` is present.
    fn exists(&self, id: EntityId) -> RepoResult<bool>;
    /// Snapshot of every row. Callers must not rely on ordering.
    fn get_all(&self) -> RepoResult<Vec<Self::Entity>>;
    /// `None` means no row with `id`.
    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Self::Entity>>;
    fn count(&self) -> RepoResult<u64>;
    /// Persists a new row and returns its storage-assigned id.
    ///
    /// Rejects blank fields, duplicate identifying values and dangling
    /// references before anything is written.
    fn create(&self, draft: &<Self::Entity as Table>::Draft) -> RepoResult<EntityId>;
    /// Replaces the full row keyed by the record id.
    fn update(&self, entity: &Self::Entity) -> RepoResult<()>;
    /// Physically removes the row keyed by the record id.
    fn delete(&self, entity: &Self::Entity) -> RepoResult<()>;
}

/// SQLite-backed repository for any record type implementing [`Table`].
pub struct SqliteRepository<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: Table> SqliteRepository<'conn, E> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self::from_ready(conn))
    }

    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }
}

impl<E: Table> Repository for SqliteRepository<'_, E> {
    type Entity = E;

    fn exists(&self, id: EntityId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);", E::TABLE),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn get_all(&self) -> RepoResult<Vec<E>> {
        query_records(
            self.conn,
            &format!("SELECT {} FROM {} ORDER BY id ASC;", E::COLUMNS, E::TABLE),
            [],
        )
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        query_record(
            self.conn,
            &format!("SELECT {} FROM {} WHERE id = ?1;", E::COLUMNS, E::TABLE),
            [id],
        )
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", E::TABLE),
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count in {}", E::TABLE)))
    }

    fn create(&self, draft: &E::Draft) -> RepoResult<EntityId> {
        let id = create_record::<E>(self.conn, draft)
            .inspect_err(|err| log_write_failure("create", E::ENTITY, err))?;
        debug!(
            "event=record_write module=repo status=ok op=create entity={} id={id}",
            E::ENTITY
        );
        Ok(id)
    }

    fn update(&self, entity: &E) -> RepoResult<()> {
        update_record(self.conn, entity)
            .inspect_err(|err| log_write_failure("update", E::ENTITY, err))
    }

    fn delete(&self, entity: &E) -> RepoResult<()> {
        delete_record::<E>(self.conn, entity.id())
            .inspect_err(|err| log_write_failure("delete", E::ENTITY, err))
    }
}

fn create_record<E: Table>(conn: &Connection, draft: &E::Draft) -> RepoResult<EntityId> {
    let record = E::draft_record(draft);
    record.validate()?;

    // The write lock is taken before the uniqueness check, so two racing
    // creates with the same key cannot both pass it.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    ensure_unique::<E>(&tx, record.unique_key())?;
    for reference in E::draft_references(draft) {
        ensure_reference(&tx, &reference)?;
    }
    let id = E::insert(&tx, draft)?;
    tx.commit()?;
    Ok(id)
}

fn update_record<E: Table>(conn: &Connection, entity: &E) -> RepoResult<()> {
    entity.validate()?;

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    for reference in entity.references() {
        ensure_reference(&tx, &reference)?;
    }
    if entity.update_row(&tx)? == 0 {
        return Err(RepoError::NotFound {
            entity: E::ENTITY,
            id: entity.id(),
        });
    }
    tx.commit()?;
    Ok(())
}

pub(crate) fn delete_record<E: Table>(conn: &Connection, id: EntityId) -> RepoResult<()> {
    let changed = conn.execute(&format!("DELETE FROM {} WHERE id = ?1;", E::TABLE), [id])?;
    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: E::ENTITY,
            id,
        });
    }
    Ok(())
}

/// Logs a failed write. Storage detail goes to the log only.
pub(crate) fn log_write_failure(op: &'static str, entity: &'static str, err: &RepoError) {
    match err {
        RepoError::Db(db_err) => error!(
            "event=record_write module=repo status=error op={op} entity={entity} error_code={} error={db_err}",
            err.code()
        ),
        _ => warn!(
            "event=record_write module=repo status=rejected op={op} entity={entity} error_code={}",
            err.code()
        ),
    }
}
