//! Upload ingestion: parse selected files and merge them by email.
//!
//! # Responsibility
//! - Turn one selected file into decoded records or a user-facing error.
//! - Decide which incoming records survive a merge into an existing set.
//!
//! # Invariants
//! - Parsing never mutates caller state; failures leave records untouched.
//! - Merge keeps the incoming order of surviving records.

pub mod merge;
pub mod parse;
