//! File selection contract between the UI picker and the record manager.
//!
//! # Responsibility
//! - Describe what a JSON file picker accepts and emits.
//! - Forward selection events unchanged to one caller-supplied handler.
//!
//! # Invariants
//! - The upload control keeps no state and validates nothing.

pub mod control;
pub mod selection;
