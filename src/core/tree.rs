//! Tree construction, search, and projection over schemaless JSON nodes
//!
//! Trees here are plain [`serde_json::Value`] objects: a node carries
//! arbitrary fields plus an optional child array under a configurable field
//! name. Four independent routines operate on them:
//!
//! - [`arr_to_tree`] / [`arr_to_tree_with`]: assemble a tree from a flat
//!   record list linked by id/parent-id fields
//! - [`find_nodes`]: pre-order predicate search returning node references
//! - [`find_node_parents`]: pre-order predicate search returning full
//!   root-to-match paths
//! - [`get_node_level`]: depth of the first pre-order match
//! - [`process_nodes`]: recursive label/value field projection
//!
//! All traversals visit a node before its descendants and assume acyclic
//! input; the search routines never copy nodes.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use valtree::{arr_to_tree, TreeOptions};
//!
//! let records = vec![
//!     json!({"id": 1, "name": "root"}),
//!     json!({"id": 2, "parentId": 1, "name": "leaf"}),
//! ];
//! let roots = arr_to_tree(&records, &TreeOptions::default());
//! assert_eq!(roots.len(), 1);
//! assert_eq!(roots[0]["children"][0]["name"], "leaf");
//! ```

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::core::error::{Error, Result};

/// Field names driving flat-list-to-tree assembly.
#[derive(Debug, Clone, Copy)]
pub struct TreeOptions<'a> {
    /// Field holding a record's unique identifier.
    pub id: &'a str,
    /// Field referencing the parent's identifier.
    pub pid: &'a str,
    /// Field name under which children are attached.
    pub children: &'a str,
}

impl Default for TreeOptions<'_> {
    fn default() -> Self {
        Self {
            id: "id",
            pid: "parentId",
            children: "children",
        }
    }
}

/// Converts a flat record list into a forest of trees.
///
/// Records whose parent id resolves to another record in the list become that
/// record's children; everything else (absent, null, or dangling parent ids,
/// and records that name themselves as parent) becomes a root. Children and
/// roots keep the input order.
///
/// Duplicate ids: the *last* record with a given id wins for parent lookups.
/// Records reachable only through a parent-id cycle are dropped.
pub fn arr_to_tree(data: &[Value], options: &TreeOptions<'_>) -> Vec<Value> {
    arr_to_tree_with(data, options, |_| {})
}

/// Like [`arr_to_tree`], but runs `callback` once on each record's mutable
/// shallow copy before assembly, to attach derived fields. The callback runs
/// before the copy is indexed, so an id it rewrites is the one parent lookups
/// see.
///
/// The callback only sees object records; non-object entries in `data` are
/// carried through untouched and always become roots.
pub fn arr_to_tree_with<F>(data: &[Value], options: &TreeOptions<'_>, mut callback: F) -> Vec<Value>
where
    F: FnMut(&mut Map<String, Value>),
{
    // Pass 1: shallow copies, derived fields, id -> index (last record wins).
    let mut copies: Vec<Value> = Vec::with_capacity(data.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(data.len());
    for (i, record) in data.iter().enumerate() {
        let mut copy = record.clone();
        if let Some(fields) = copy.as_object_mut() {
            callback(fields);
        }
        // Index the copy, not the original: ids derived or normalized by the
        // callback participate in parent lookup.
        if let Some(id) = copy.get(options.id).filter(|v| !v.is_null()) {
            index.insert(scalar_key(id), i);
        }
        copies.push(copy);
    }

    // Pass 2: resolve parents, collect child indexes and roots in input order.
    let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (i, record) in data.iter().enumerate() {
        let parent = record
            .get(options.pid)
            .filter(|v| !v.is_null())
            .and_then(|pid| index.get(&scalar_key(pid)).copied());
        match parent {
            Some(p) if p != i => children_of.entry(p).or_default().push(i),
            _ => roots.push(i),
        }
    }

    roots
        .into_iter()
        .map(|i| assemble(i, &mut copies, &children_of, options.children))
        .collect()
}

/// Moves node `i` out of the copy pool and attaches its (recursively
/// assembled) children. Each index has at most one parent, so every slot is
/// taken exactly once.
fn assemble(
    i: usize,
    copies: &mut [Value],
    children_of: &HashMap<usize, Vec<usize>>,
    children_key: &str,
) -> Value {
    let mut node = std::mem::take(&mut copies[i]);
    if let Some(child_indexes) = children_of.get(&i) {
        let mut children = Vec::with_capacity(child_indexes.len());
        for &child in child_indexes {
            children.push(assemble(child, copies, children_of, children_key));
        }
        if let Some(fields) = node.as_object_mut() {
            fields.insert(children_key.to_string(), Value::Array(children));
        }
    }
    node
}

/// Canonical lookup key for an id value. The serialized form keeps types
/// apart: the number `1` and the string `"1"` never collide.
fn scalar_key(value: &Value) -> String {
    value.to_string()
}

/// Collects every node satisfying `matcher`, in pre-order.
///
/// Returned references alias the tree; no nodes are copied. An empty result
/// means nothing matched.
pub fn find_nodes<'a, F>(roots: &'a [Value], matcher: F, children_key: &str) -> Vec<&'a Value>
where
    F: Fn(&Value) -> bool,
{
    let mut found = Vec::new();
    collect_matches(roots, &matcher, children_key, &mut found);
    found
}

fn collect_matches<'a, F>(
    nodes: &'a [Value],
    matcher: &F,
    children_key: &str,
    found: &mut Vec<&'a Value>,
) where
    F: Fn(&Value) -> bool,
{
    for node in nodes {
        if matcher(node) {
            found.push(node);
        }
        if let Some(children) = node.get(children_key).and_then(Value::as_array) {
            collect_matches(children, matcher, children_key, found);
        }
    }
}

/// Collects the root-to-match path for every node satisfying `predicate`.
///
/// Traversal is pre-order and does not stop at a match: a matching ancestor
/// and a matching descendant both yield paths, sharing a prefix. Children are
/// read from the fixed `"children"` field.
pub fn find_node_parents<'a, F>(roots: &'a [Value], predicate: F) -> Vec<Vec<&'a Value>>
where
    F: Fn(&Value) -> bool,
{
    let mut paths = Vec::new();
    let mut trail = Vec::new();
    collect_paths(roots, &predicate, &mut trail, &mut paths);
    paths
}

fn collect_paths<'a, F>(
    nodes: &'a [Value],
    predicate: &F,
    trail: &mut Vec<&'a Value>,
    paths: &mut Vec<Vec<&'a Value>>,
) where
    F: Fn(&Value) -> bool,
{
    for node in nodes {
        trail.push(node);
        if predicate(node) {
            paths.push(trail.clone());
        }
        if let Some(children) = node.get("children").and_then(Value::as_array) {
            collect_paths(children, predicate, trail, paths);
        }
        trail.pop();
    }
}

/// Depth of the first pre-order node satisfying `predicate`, roots at level 1.
///
/// Traversal short-circuits after the first match; `None` means no node
/// matched. Children are read from the fixed `"children"` field.
pub fn get_node_level<F>(roots: &[Value], predicate: F) -> Option<usize>
where
    F: Fn(&Value) -> bool,
{
    level_of(roots, &predicate, 1)
}

fn level_of<F>(nodes: &[Value], predicate: &F, level: usize) -> Option<usize>
where
    F: Fn(&Value) -> bool,
{
    for node in nodes {
        if predicate(node) {
            return Some(level);
        }
        if let Some(children) = node.get("children").and_then(Value::as_array)
            && let Some(found) = level_of(children, predicate, level + 1)
        {
            return Some(found);
        }
    }
    None
}

/// Projects a node array to `{"label", "value", "children"?}` records.
///
/// Each object node is reduced to the two requested fields, renamed to the
/// fixed output names; `children` is projected recursively and only kept when
/// present and non-empty. A null or non-object node projects to JSON null so
/// the output keeps positional correspondence with the input.
///
/// # Errors
///
/// Fails fast with [`Error::InvalidArgument`] - before producing any output -
/// when `nodes` is not an array or either field name is empty.
pub fn process_nodes(nodes: &Value, label_field: &str, value_field: &str) -> Result<Vec<Value>> {
    let Some(items) = nodes.as_array() else {
        return Err(Error::invalid_argument("nodes", "expected an array of nodes"));
    };
    if label_field.is_empty() {
        return Err(Error::invalid_argument("label_field", "field name must be non-empty"));
    }
    if value_field.is_empty() {
        return Err(Error::invalid_argument("value_field", "field name must be non-empty"));
    }

    Ok(items
        .iter()
        .map(|node| project_node(node, label_field, value_field))
        .collect())
}

fn project_node(node: &Value, label_field: &str, value_field: &str) -> Value {
    let Some(fields) = node.as_object() else {
        return Value::Null;
    };

    let mut out = Map::new();
    out.insert(
        "label".to_string(),
        fields.get(label_field).cloned().unwrap_or(Value::Null),
    );
    out.insert(
        "value".to_string(),
        fields.get(value_field).cloned().unwrap_or(Value::Null),
    );
    if let Some(children) = fields.get("children").and_then(Value::as_array)
        && !children.is_empty()
    {
        out.insert(
            "children".to_string(),
            Value::Array(
                children
                    .iter()
                    .map(|child| project_node(child, label_field, value_field))
                    .collect(),
            ),
        );
    }
    Value::Object(out)
}
