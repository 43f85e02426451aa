//! Cycle-safe deep cloning over heterogeneous value graphs
//!
//! [`deep_clone`] duplicates an arbitrary [`Value`] graph: every shared
//! container in the source gets exactly one fresh counterpart in the copy, so
//! cycles terminate and shared references stay shared. The mechanism is an
//! identity map from visited source containers (keyed by allocation address)
//! to their in-progress clones; the entry is recorded *before* recursing into
//! children, which is what makes `a.self = a` come out as
//! `clone.self = clone`.
//!
//! # What gets copied
//!
//! - Scalars, dates, and patterns are plain owned data: returned as fresh
//!   copies with identical contents.
//! - Objects and arrays clone every entry's value under the same key/index.
//! - Sets clone every element, in order.
//! - Maps clone every *value*; keys are carried over as shallow handles, so a
//!   container used as a key stays shared between source and clone. Map keys
//!   are commonly primitives or intentionally shared markers, and cloning
//!   them would break lookups that rely on key identity.
//! - Callables cannot be cloned and fail with
//!   [`Error::UnsupportedClone`](crate::Error::UnsupportedClone); a closure
//!   cannot be duplicated from the outside without losing its environment.
//!
//! # Example
//!
//! ```
//! use valtree::{deep_clone, Value};
//!
//! let inner = Value::array_from(vec![Value::Int(1)]);
//! let source = Value::object_from([("a", inner.clone()), ("b", inner)]);
//!
//! let copy = deep_clone(&source).unwrap();
//! assert!(valtree::structural_eq(&source, &copy));
//! assert!(!copy.same_container(&source));
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::core::error::{Error, Result};
use crate::core::value::{insert_unique, ContainerKind, Value};

/// Deep-clones a value graph, preserving cycles and shared references.
///
/// # Errors
///
/// Returns [`Error::UnsupportedClone`] if the graph contains a callable value
/// anywhere; no partial clone escapes in that case.
pub fn deep_clone(source: &Value) -> Result<Value> {
    let mut seen = HashMap::new();
    clone_value(source, &mut seen)
}

/// One recursion step. `seen` maps source allocation addresses to their
/// (possibly still empty) clones and is scoped to a single `deep_clone` call.
fn clone_value(source: &Value, seen: &mut HashMap<usize, Value>) -> Result<Value> {
    match source {
        // Owned data: the derived clone already is a fresh copy.
        Value::Null
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Str(_)
        | Value::Date(_)
        | Value::Pattern(_) => Ok(source.clone()),

        Value::Func(_) => Err(Error::UnsupportedClone(ContainerKind::Function)),

        Value::Object(cell) => {
            let address = Rc::as_ptr(cell) as usize;
            if let Some(existing) = seen.get(&address) {
                return Ok(existing.clone());
            }
            let target = Rc::new(RefCell::new(BTreeMap::new()));
            seen.insert(address, Value::Object(Rc::clone(&target)));

            // Snapshot the entries so no borrow is held across recursion.
            let entries: Vec<(String, Value)> = cell
                .borrow()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            for (key, value) in entries {
                let cloned = clone_value(&value, seen)?;
                target.borrow_mut().insert(key, cloned);
            }
            Ok(Value::Object(target))
        }

        Value::Array(cell) => {
            let address = Rc::as_ptr(cell) as usize;
            if let Some(existing) = seen.get(&address) {
                return Ok(existing.clone());
            }
            let target = Rc::new(RefCell::new(Vec::new()));
            seen.insert(address, Value::Array(Rc::clone(&target)));

            let items: Vec<Value> = cell.borrow().clone();
            for item in items {
                let cloned = clone_value(&item, seen)?;
                target.borrow_mut().push(cloned);
            }
            Ok(Value::Array(target))
        }

        Value::Set(cell) => {
            let address = Rc::as_ptr(cell) as usize;
            if let Some(existing) = seen.get(&address) {
                return Ok(existing.clone());
            }
            let target = Rc::new(RefCell::new(Vec::new()));
            seen.insert(address, Value::Set(Rc::clone(&target)));

            let elements: Vec<Value> = cell.borrow().clone();
            for element in elements {
                let cloned = clone_value(&element, seen)?;
                insert_unique(&mut target.borrow_mut(), cloned);
            }
            Ok(Value::Set(target))
        }

        Value::Map(cell) => {
            let address = Rc::as_ptr(cell) as usize;
            if let Some(existing) = seen.get(&address) {
                return Ok(existing.clone());
            }
            let target = Rc::new(RefCell::new(Vec::new()));
            seen.insert(address, Value::Map(Rc::clone(&target)));

            let entries: Vec<(Value, Value)> = cell.borrow().clone();
            for (key, value) in entries {
                let cloned = clone_value(&value, seen)?;
                // Keys stay shallow: shared key identity is intentional.
                target.borrow_mut().push((key, cloned));
            }
            Ok(Value::Map(target))
        }
    }
}
