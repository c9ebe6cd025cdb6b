//! Reviewer table mapping and reviewer traversals.

use super::record_repo::{RepoResult, Repository, SqliteRepository};
use super::review_repo::REVIEW_COLUMNS;
use super::table::{query_records, Table};
use crate::model::review::Review;
use crate::model::reviewer::{Reviewer, ReviewerId};
use crate::model::{EntityId, ValidationError};
use rusqlite::{params, Connection, Row};

impl Table for Reviewer {
    const ENTITY: &'static str = "reviewer";
    const TABLE: &'static str = "reviewers";
    const COLUMNS: &'static str = "id, first_name, last_name";
    const UNIQUE_COLUMN: &'static str = "last_name";

    type Draft = Reviewer;

    fn id(&self) -> EntityId {
        self.id
    }

    fn draft_record(draft: &Reviewer) -> &Reviewer {
        draft
    }

    fn unique_key(&self) -> &str {
        &self.last_name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Reviewer::validate(self)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
        })
    }

    fn insert(conn: &Connection, draft: &Reviewer) -> RepoResult<EntityId> {
        conn.execute(
            "INSERT INTO reviewers (first_name, last_name) VALUES (?1, ?2);",
            params![draft.first_name, draft.last_name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE reviewers SET first_name = ?2, last_name = ?3 WHERE id = ?1;",
            params![self.id, self.first_name, self.last_name],
        )?)
    }
}

/// Reviewer repository: generic record operations plus authored reviews.
pub trait ReviewerRepository: Repository<Entity = Reviewer> {
    /// Reviews written by `reviewer_id`. Ordering is unspecified.
    fn reviews_by_reviewer(&self, reviewer_id: ReviewerId) -> RepoResult<Vec<Review>>;
}

pub type SqliteReviewerRepository<'conn> = SqliteRepository<'conn, Reviewer>;

impl ReviewerRepository for SqliteReviewerRepository<'_> {
    fn reviews_by_reviewer(&self, reviewer_id: ReviewerId) -> RepoResult<Vec<Review>> {
        query_records(
            self.conn(),
            &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE reviewer_id = ?1;"),
            [reviewer_id],
        )
    }
}
