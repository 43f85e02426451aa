//! valtree - generic utilities for structured in-memory data
//!
//! A small library of the helpers browser-style applications keep rewriting:
//! deep cloning, tree wrangling, object filtering, call debouncing, and a thin
//! persistent key-value store.
//!
//! # Architecture
//!
//! - [`core`] - the algorithmic heart: cycle-safe deep cloning over a dynamic
//!   value graph, and tree construction/search/projection over JSON nodes
//! - [`filter`] - object field filtering (compact, pick, clear)
//! - [`debounce`] - trailing-edge call coalescing on tokio timers
//! - [`storage`] - directory-backed key-value persistence with
//!   degrade-don't-fail semantics
//!
//! # Design points
//!
//! - Cloning preserves aliasing: shared references and cycles in the source
//!   come out as shared references and cycles in the copy, via an identity
//!   map populated before recursion.
//! - Cloning callables is refused with an explicit error instead of
//!   producing an environment-less copy.
//! - Tree routines are pure, pre-order, and never copy nodes during search.
//! - Storage reads degrade to `None` and writes log-and-continue; writes are
//!   atomic (temp file + rename).

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_lifetimes)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]

pub mod core;
pub mod debounce;
pub mod filter;
pub mod storage;

// Re-export commonly used types
pub use crate::core::clone::deep_clone;
pub use crate::core::error::{Error, Result};
pub use crate::core::tree::{
    TreeOptions, arr_to_tree, arr_to_tree_with, find_node_parents, find_nodes, get_node_level,
    process_nodes,
};
pub use crate::core::value::{ContainerKind, Func, Pattern, Value, structural_eq};
pub use crate::debounce::Debouncer;
pub use crate::storage::Storage;
