//! Review table mapping and review traversals.
//!
//! # Invariants
//! - Create and update resolve both `pokemon_id` and `reviewer_id` inside
//!   the write transaction.
//! - `delete_reviews` removes every listed review or none of them.

use super::record_repo::{delete_record, log_write_failure, RepoResult, Repository, SqliteRepository};
use super::table::{query_records, Reference, Table};
use crate::model::pokemon::{Pokemon, PokemonId};
use crate::model::review::Review;
use crate::model::reviewer::Reviewer;
use crate::model::{EntityId, ValidationError};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

pub(crate) const REVIEW_COLUMNS: &str = "id, title, text, rating, pokemon_id, reviewer_id";

impl Table for Review {
    const ENTITY: &'static str = "review";
    const TABLE: &'static str = "reviews";
    const COLUMNS: &'static str = REVIEW_COLUMNS;
    const UNIQUE_COLUMN: &'static str = "title";

    type Draft = Review;

    fn id(&self) -> EntityId {
        self.id
    }

    fn draft_record(draft: &Review) -> &Review {
        draft
    }

    fn unique_key(&self) -> &str {
        &self.title
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Review::validate(self)
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::to::<Pokemon>(self.pokemon_id),
            Reference::to::<Reviewer>(self.reviewer_id),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            text: row.get("text")?,
            rating: row.get("rating")?,
            pokemon_id: row.get("pokemon_id")?,
            reviewer_id: row.get("reviewer_id")?,
        })
    }

    fn insert(conn: &Connection, draft: &Review) -> RepoResult<EntityId> {
        conn.execute(
            "INSERT INTO reviews (title, text, rating, pokemon_id, reviewer_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                draft.title,
                draft.text,
                draft.rating,
                draft.pokemon_id,
                draft.reviewer_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(&self, conn: &Connection) -> RepoResult<usize> {
        Ok(conn.execute(
            "UPDATE reviews
             SET title = ?2,
                 text = ?3,
                 rating = ?4,
                 pokemon_id = ?5,
                 reviewer_id = ?6
             WHERE id = ?1;",
            params![
                self.id,
                self.title,
                self.text,
                self.rating,
                self.pokemon_id,
                self.reviewer_id,
            ],
        )?)
    }
}

/// Review repository: generic record operations plus per-pokemon lookup and
/// bulk delete.
pub trait ReviewRepository: Repository<Entity = Review> {
    /// Reviews whose pokemon is `pokemon_id`. Ordering is unspecified.
    fn reviews_for_pokemon(&self, pokemon_id: PokemonId) -> RepoResult<Vec<Review>>;
    /// Deletes all listed reviews in one transaction.
    fn delete_reviews(&self, reviews: &[Review]) -> RepoResult<()>;
}

pub type SqliteReviewRepository<'conn> = SqliteRepository<'conn, Review>;

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn reviews_for_pokemon(&self, pokemon_id: PokemonId) -> RepoResult<Vec<Review>> {
        query_records(
            self.conn(),
            &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE pokemon_id = ?1;"),
            [pokemon_id],
        )
    }

    fn delete_reviews(&self, reviews: &[Review]) -> RepoResult<()> {
        delete_all(self.conn(), reviews)
            .inspect_err(|err| log_write_failure("delete_many", Review::ENTITY, err))?;
        debug!(
            "event=record_write module=repo status=ok op=delete_many entity=review count={}",
            reviews.len()
        );
        Ok(())
    }
}

fn delete_all(conn: &Connection, reviews: &[Review]) -> RepoResult<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    for review in reviews {
        delete_record::<Review>(&tx, review.id)?;
    }
    tx.commit()?;
    Ok(())
}
