//! Core algorithms: deep cloning and tree utilities
//!
//! The two groups are independent and only live together because they are the
//! non-trivial pieces of the crate:
//!
//! - [`value`]: the dynamic value graph the cloner operates on
//! - [`clone`]: cycle-safe deep cloning with shared-reference preservation
//! - [`tree`]: flat-list-to-tree assembly, predicate search, depth lookup,
//!   and field projection over JSON nodes
//! - [`error`]: error types shared across the crate

pub mod clone;
pub mod error;
pub mod tree;
pub mod value;
