//! Dynamic value graph for the cloning routines
//!
//! Rust has no ambient dynamically-typed object graph, so this module defines
//! one: [`Value`] covers scalars, instants, patterns, callables, and four
//! shared mutable container kinds (object, array, set, map). Containers are
//! `Rc<RefCell<...>>` handles, which makes aliasing and cycles expressible -
//! two `Value`s can point at the same underlying container, and a container
//! can (indirectly) contain itself.
//!
//! # Identity vs. structure
//!
//! `Value::clone()` (the derived impl) copies the *handle*: both values refer
//! to the same container afterwards. A full copy of the graph is the job of
//! [`deep_clone`](crate::core::clone::deep_clone). Two notions of equality
//! exist accordingly:
//!
//! - [`Value::same_container`] - reference identity, true only for two handles
//!   to the same allocation
//! - [`structural_eq`] - cycle-safe deep comparison of contents
//!
//! # Example
//!
//! ```
//! use valtree::Value;
//!
//! let shared = Value::array_from(vec![Value::Int(1), Value::Int(2)]);
//! let a = shared.clone();
//! assert!(a.same_container(&shared));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;

/// Shared handle to a string-keyed object. Fields iterate in sorted key
/// order, not insertion order.
pub type ObjectRef = Rc<RefCell<BTreeMap<String, Value>>>;
/// Shared handle to an array of values.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
/// Shared handle to an insertion-ordered set of values.
pub type SetRef = Rc<RefCell<Vec<Value>>>;
/// Shared handle to an insertion-ordered map with arbitrary value keys.
pub type MapRef = Rc<RefCell<Vec<(Value, Value)>>>;

/// Closed enumeration of the non-scalar value kinds
///
/// Used for clone dispatch and error reporting. Keeping this closed (no
/// "unknown kind" variant) is deliberate: an unrecognized kind cannot fall
/// through to a generic path and clone incorrectly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum ContainerKind {
    #[strum(serialize = "object")]
    Object,
    #[strum(serialize = "array")]
    Array,
    #[strum(serialize = "set")]
    Set,
    #[strum(serialize = "map")]
    Map,
    #[strum(serialize = "date")]
    Date,
    #[strum(serialize = "pattern")]
    Pattern,
    #[strum(serialize = "function")]
    Function,
}

/// A regular-expression literal: source text plus flags
///
/// Stored as text rather than a compiled matcher so that copies are exact and
/// comparison is well-defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub source: String,
    pub flags: String,
}

impl Pattern {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// A named callable value
///
/// Callables participate in the value graph (they can sit in objects, arrays,
/// sets, and maps) but are opaque: they compare by identity and refuse to be
/// deep-cloned.
pub struct Func {
    name: String,
    body: Box<dyn Fn(&[Value]) -> Value>,
}

impl Func {
    pub fn new(name: impl Into<String>, body: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.body)(args)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func").field("name", &self.name).finish()
    }
}

/// A node in a heterogeneous value graph
///
/// Scalars carry their data inline; `Date` and `Pattern` are plain owned data
/// as well. `Func` and the four container variants are reference-counted
/// handles, so the derived `Clone` is shallow for them.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(DateTime<Utc>),
    Pattern(Pattern),
    Func(Rc<Func>),
    Object(ObjectRef),
    Array(ArrayRef),
    Set(SetRef),
    Map(MapRef),
}

impl Value {
    /// Fresh empty object.
    pub fn object() -> Self {
        Value::Object(Rc::new(RefCell::new(BTreeMap::new())))
    }

    /// Fresh empty array.
    pub fn array() -> Self {
        Value::Array(Rc::new(RefCell::new(Vec::new())))
    }

    /// Fresh empty set.
    pub fn set() -> Self {
        Value::Set(Rc::new(RefCell::new(Vec::new())))
    }

    /// Fresh empty map.
    pub fn map() -> Self {
        Value::Map(Rc::new(RefCell::new(Vec::new())))
    }

    /// Object populated from `(key, value)` pairs.
    pub fn object_from<K>(entries: impl IntoIterator<Item = (K, Value)>) -> Self
    where
        K: Into<String>,
    {
        let fields: BTreeMap<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect();
        Value::Object(Rc::new(RefCell::new(fields)))
    }

    /// Array populated from the given items.
    pub fn array_from(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Set populated from the given items, deduplicated by set semantics.
    pub fn set_from(items: impl IntoIterator<Item = Value>) -> Self {
        let set = Value::set();
        if let Value::Set(cell) = &set {
            let mut elements = cell.borrow_mut();
            for item in items {
                insert_unique(&mut elements, item);
            }
        }
        set
    }

    /// Map populated from `(key, value)` entries, in order.
    pub fn map_from(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    /// Callable value wrapping `body`.
    pub fn func(name: impl Into<String>, body: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Value::Func(Rc::new(Func::new(name, body)))
    }

    /// The non-scalar kind of this value, if it has one.
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Value::Object(_) => Some(ContainerKind::Object),
            Value::Array(_) => Some(ContainerKind::Array),
            Value::Set(_) => Some(ContainerKind::Set),
            Value::Map(_) => Some(ContainerKind::Map),
            Value::Date(_) => Some(ContainerKind::Date),
            Value::Pattern(_) => Some(ContainerKind::Pattern),
            Value::Func(_) => Some(ContainerKind::Function),
            _ => None,
        }
    }

    /// True for the four shared container kinds (object, array, set, map).
    pub fn is_shared_container(&self) -> bool {
        matches!(
            self,
            Value::Object(_) | Value::Array(_) | Value::Set(_) | Value::Map(_)
        )
    }

    /// True when this value compares by reference identity (shared containers
    /// and callables) rather than by contents.
    pub fn has_identity(&self) -> bool {
        self.is_shared_container() || matches!(self, Value::Func(_))
    }

    /// Reference-identity comparison: true only when both values are handles
    /// to the same allocation. Always false for scalars.
    pub fn same_container(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::Func(a), Value::Func(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Stable address of the underlying allocation, for identity maps.
    /// `None` for values without reference identity.
    pub(crate) fn address(&self) -> Option<usize> {
        match self {
            Value::Object(cell) => Some(Rc::as_ptr(cell) as usize),
            Value::Array(cell) => Some(Rc::as_ptr(cell) as usize),
            Value::Set(cell) => Some(Rc::as_ptr(cell) as usize),
            Value::Map(cell) => Some(Rc::as_ptr(cell) as usize),
            Value::Func(f) => Some(Rc::as_ptr(f) as usize),
            _ => None,
        }
    }
}

/// Inserts `item` into a set's backing store unless an equal member exists.
///
/// Membership follows the usual set semantics for mixed values: identity for
/// containers and callables, structural equality for everything else.
pub(crate) fn insert_unique(elements: &mut Vec<Value>, item: Value) {
    let present = elements.iter().any(|existing| {
        if item.has_identity() {
            existing.same_container(&item)
        } else {
            structural_eq(existing, &item)
        }
    });
    if !present {
        elements.push(item);
    }
}

/// Cycle-safe structural equality over two value graphs.
///
/// Containers compare by contents, in order; callables compare by identity.
/// A visited-pair guard makes the comparison terminate on cyclic graphs: a
/// revisited pair is assumed equal, which is the coinductive reading (two
/// cycles are equal when no finite unrolling distinguishes them).
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    let mut seen = HashSet::new();
    eq_values(a, b, &mut seen)
}

fn eq_values(a: &Value, b: &Value, seen: &mut HashSet<(usize, usize)>) -> bool {
    // Identical handles are always equal, cycles included.
    if a.same_container(b) {
        return true;
    }
    if let (Some(pa), Some(pb)) = (a.address(), b.address())
        && !seen.insert((pa, pb))
    {
        return true;
    }

    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        (Value::Pattern(x), Value::Pattern(y)) => x == y,
        // Callables reach here only when the identity check above failed.
        (Value::Func(_), Value::Func(_)) => false,
        (Value::Object(x), Value::Object(y)) => {
            let x = x.borrow();
            let y = y.borrow();
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|((ka, va), (kb, vb))| {
                    ka == kb && eq_values(va, vb, seen)
                })
        }
        (Value::Array(x), Value::Array(y)) | (Value::Set(x), Value::Set(y)) => {
            let x = x.borrow();
            let y = y.borrow();
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|(va, vb)| eq_values(va, vb, seen))
        }
        (Value::Map(x), Value::Map(y)) => {
            let x = x.borrow();
            let y = y.borrow();
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|((ka, va), (kb, vb))| {
                    eq_values(ka, kb, seen) && eq_values(va, vb, seen)
                })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shallow_clone_shares_the_container() {
        let original = Value::object_from([("a", Value::Int(1))]);
        let handle = original.clone();
        assert!(handle.same_container(&original));
    }

    #[test]
    fn test_same_container_is_false_across_allocations() {
        let a = Value::array_from(vec![Value::Int(1)]);
        let b = Value::array_from(vec![Value::Int(1)]);
        assert!(!a.same_container(&b));
        assert!(structural_eq(&a, &b));
    }

    #[test]
    fn test_scalars_have_no_identity() {
        assert!(!Value::Int(3).same_container(&Value::Int(3)));
        assert!(Value::Str("x".into()).address().is_none());
    }

    #[test]
    fn test_structural_eq_mixed_kinds() {
        assert!(!structural_eq(&Value::Int(1), &Value::Float(1.0)));
        assert!(!structural_eq(&Value::array(), &Value::set()));
        assert!(structural_eq(&Value::Null, &Value::Null));
    }

    #[test]
    fn test_structural_eq_terminates_on_cycles() {
        let a = Value::object();
        let b = Value::object();
        if let (Value::Object(ca), Value::Object(cb)) = (&a, &b) {
            ca.borrow_mut().insert("self".to_string(), a.clone());
            cb.borrow_mut().insert("self".to_string(), b.clone());
        }
        assert!(structural_eq(&a, &b));
    }

    #[test]
    fn test_set_from_deduplicates_scalars_not_containers() {
        let first = Value::array();
        let second = Value::array();
        let set = Value::set_from(vec![
            Value::Int(1),
            Value::Int(1),
            first.clone(),
            first,
            second,
        ]);
        if let Value::Set(cell) = set {
            // 1 scalar + 2 distinct array identities
            assert_eq!(cell.borrow().len(), 3);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_container_kind_display_names() {
        assert_eq!(ContainerKind::Object.to_string(), "object");
        assert_eq!(ContainerKind::Function.to_string(), "function");
        assert_eq!(Value::map().container_kind(), Some(ContainerKind::Map));
        assert_eq!(Value::Int(0).container_kind(), None);
    }

    #[test]
    fn test_func_is_callable_and_identity_compared() {
        let double = Value::func("double", |args| match args.first() {
            Some(Value::Int(n)) => Value::Int(n * 2),
            _ => Value::Null,
        });
        if let Value::Func(f) = &double {
            assert_eq!(f.name(), "double");
            assert!(structural_eq(&f.call(&[Value::Int(21)]), &Value::Int(42)));
        }
        let other = Value::func("double", |_| Value::Null);
        assert!(!structural_eq(&double, &other));
        assert!(double.same_container(&double.clone()));
    }

    #[test]
    fn test_pattern_display() {
        let p = Pattern::new("a+b", "gi");
        assert_eq!(p.to_string(), "/a+b/gi");
    }
}
