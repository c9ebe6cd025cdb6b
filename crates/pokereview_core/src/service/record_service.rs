//! Record use-case service.
//!
//! # Responsibility
//! - Wrap any `Repository` with the boundary checks callers must run before
//!   id-keyed reads and writes.
//! - Read records back after writes so callers get the stored state.
//!
//! # Invariants
//! - `update` rejects a record whose id differs from the addressed id.
//! - `update` and `delete` run an existence check first; an absent id is
//!   `NotFound`, never a repository call.

use crate::model::EntityId;
use crate::repo::record_repo::{RepoError, Repository};
use crate::repo::table::Table;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for record use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Addressed record does not exist.
    NotFound { entity: &'static str, id: EntityId },
    /// Addressed id and record id disagree.
    IdMismatch { path_id: EntityId, record_id: EntityId },
    /// Write succeeded but read-back did not find the record.
    InconsistentState(&'static str),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::IdMismatch { path_id, record_id } => write!(
                f,
                "record id {record_id} does not match addressed id {path_id}"
            ),
            Self::InconsistentState(details) => write!(f, "inconsistent record state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

/// Boundary-checked facade over one record repository.
pub struct RecordService<R: Repository> {
    repo: R,
}

impl<R: Repository> RecordService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Underlying repository, for relationship traversals.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn list(&self) -> ServiceResult<Vec<R::Entity>> {
        Ok(self.repo.get_all()?)
    }

    pub fn get(&self, id: EntityId) -> ServiceResult<R::Entity> {
        self.repo.get_by_id(id)?.ok_or(ServiceError::NotFound {
            entity: <R::Entity as Table>::ENTITY,
            id,
        })
    }

    /// Creates a record and returns it as stored.
    pub fn create(&self, draft: &<R::Entity as Table>::Draft) -> ServiceResult<R::Entity> {
        let id = self.repo.create(draft)?;
        self.repo
            .get_by_id(id)?
            .ok_or(ServiceError::InconsistentState(
                "created record not found in read-back",
            ))
    }

    /// Replaces the record addressed by `path_id` and returns it as stored.
    pub fn update(&self, path_id: EntityId, record: &R::Entity) -> ServiceResult<R::Entity> {
        if record.id() != path_id {
            return Err(ServiceError::IdMismatch {
                path_id,
                record_id: record.id(),
            });
        }
        self.ensure_exists(path_id)?;

        self.repo.update(record)?;
        self.repo
            .get_by_id(path_id)?
            .ok_or(ServiceError::InconsistentState(
                "updated record not found in read-back",
            ))
    }

    /// Deletes the record addressed by `id`.
    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        self.ensure_exists(id)?;
        let record = self.get(id)?;
        self.repo.delete(&record)?;
        Ok(())
    }

    fn ensure_exists(&self, id: EntityId) -> ServiceResult<()> {
        if !self.repo.exists(id)? {
            return Err(ServiceError::NotFound {
                entity: <R::Entity as Table>::ENTITY,
                id,
            });
        }
        Ok(())
    }
}
