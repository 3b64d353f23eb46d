//! # hs-core
//!
//! Core types for housestat: the household table, its schema, the canonical
//! household-size bucketing rule, and the shared error type.
//!
//! Every analysis crate consumes a [`HouseholdTable`] read-only; nothing in the
//! workspace mutates a row after it has been pushed into a table.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod table;
pub mod types;

pub use error::{Error, Result};
pub use table::{HouseholdRecord, HouseholdTable, Schema, TableBuilder};
pub use types::{Column, HouseholdType, KeyValue, SizeBucket};

/// Crate version, reported by `housestat version` and in bundle metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
