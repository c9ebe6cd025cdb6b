//! Repository layer: the only gateway between callers and record storage.
//!
//! # Responsibility
//! - Define one generic record contract (`Repository`) plus per-record
//!   traversal traits.
//! - Keep SQL, junction-table maintenance and transaction scope inside the
//!   repository boundary.
//!
//! # Invariants
//! - Writes enforce record validation, the uniqueness precondition and
//!   reference resolution before any row is written.
//! - Reads signal absence with `Option`/`bool` or an empty list, not errors.

pub mod category_repo;
pub mod country_repo;
pub mod owner_repo;
pub mod pokemon_repo;
pub mod record_repo;
pub mod repositories;
pub mod review_repo;
pub mod reviewer_repo;
pub mod table;
