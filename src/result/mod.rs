//! # Result values and the result set.
//!
//! - [`Value`] — tagged union of the payloads a trigger can carry
//! - [`ValueKind`] — the tag alone, reported on type mismatches
//! - [`ResultSet`] — thread-safe `key → Value` bag returned by multi-key waits

mod set;
mod value;

pub use set::ResultSet;
pub use value::{Value, ValueKind};
