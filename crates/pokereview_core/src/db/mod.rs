//! Record-store bootstrap.
//!
//! # Responsibility
//! - Hand out SQLite connections holding the category, country, owner,
//!   pokemon, reviewer and review tables at the latest schema version.
//! - Report why a store could not be opened (`DbError`).
//!
//! # Invariants
//! - Repositories accept only connections at the version set here.
//! - Foreign keys are enforced on every returned connection; deleting a
//!   pokemon, owner, category or reviewer cascades to its links and reviews.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_db_with};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open, configure or migrate the record store.
#[derive(Debug)]
pub enum DbError {
    /// SQLite engine error; never shown to repository callers directly.
    Sqlite(rusqlite::Error),
    /// The store was written by a build with newer schema steps.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "record store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
