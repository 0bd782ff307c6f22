//! Repository layer for the in-memory record set.
//!
//! # Responsibility
//! - Define the data access contract used by the record manager.
//! - Keep storage shape (ordering, id matching) out of the service.
//!
//! # Invariants
//! - Insertion order is preserved across append/update/remove.
//! - Id-addressed writes apply to every record carrying that id.

pub mod record_repo;
