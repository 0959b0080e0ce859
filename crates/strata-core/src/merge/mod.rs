//! Merging of property sources into one snapshot.
//!
//! # Rules
//! 1. Sources are applied in the order they were added.
//! 2. A key present in a later source replaces the value from an earlier one.
//! 3. List values are plain strings and are replaced, never concatenated.

pub mod source_list;
pub use source_list::PropertySourceList;
