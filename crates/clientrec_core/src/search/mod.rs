//! Type-as-you-search filtering over the record set.
//!
//! # Responsibility
//! - Match records against a case-insensitive substring query.
//!
//! # Invariants
//! - An empty query matches every record.
//! - Filtering preserves record-set order.

pub mod filter;
