//! Record manager use-case service.
//!
//! # Responsibility
//! - Own all editor state: records, search text, edit cursor, page cursor
//!   and the single displayed error.
//! - Orchestrate ingest, repository writes and view projection.
//!
//! # See also
//! - `crate::ingest` for parsing and merge rules.

pub mod pagination;
pub mod record_manager;
