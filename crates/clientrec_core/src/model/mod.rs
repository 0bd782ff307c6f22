//! Client record domain model.
//!
//! # Responsibility
//! - Define the record shape shared by ingest, repository and UI projections.
//!
//! # Invariants
//! - `email` is the only deduplication key; `id` uniqueness is not enforced.
//! - Unknown input fields survive a decode/encode cycle unchanged.

pub mod record;
