//! Use-case services over the repository layer.
//!
//! # Responsibility
//! - Apply the caller-side guards (existence, id match) that repositories
//!   expect to have been checked.
//! - Stay storage-agnostic: services only talk to repository traits.

pub mod record_service;
