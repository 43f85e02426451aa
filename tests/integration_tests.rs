//! Integration tests for valtree
//!
//! These tests exercise the crate surface the way an application would:
//! building a tree from flat records, searching it, projecting it for a
//! picker widget, persisting derived state, and debouncing refresh triggers.

use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use valtree::storage::Storage;
use valtree::{
    Debouncer, TreeOptions, Value, arr_to_tree_with, deep_clone, find_node_parents, find_nodes,
    get_node_level, process_nodes, structural_eq,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A small org chart as it would arrive from an API: flat, ordered, with one
/// dangling reference.
fn org_records() -> Vec<serde_json::Value> {
    vec![
        json!({"id": 1, "name": "Engineering"}),
        json!({"id": 2, "parentId": 1, "name": "Platform"}),
        json!({"id": 3, "parentId": 1, "name": "Product"}),
        json!({"id": 4, "parentId": 3, "name": "Mobile"}),
        json!({"id": 5, "parentId": 42, "name": "Contractors"}),
    ]
}

#[test]
fn test_records_to_tree_to_search_to_projection() {
    let roots = arr_to_tree_with(&org_records(), &TreeOptions::default(), |fields| {
        let label = fields["name"].as_str().unwrap_or_default().to_uppercase();
        fields.insert("label".to_string(), json!(label));
    });

    // Dangling parentId 42 makes "Contractors" a second root.
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[1]["name"], "Contractors");

    // Search the assembled tree.
    let teams = find_nodes(&roots, |n| n.get("parentId").is_some(), "children");
    assert_eq!(teams.len(), 4);

    let paths = find_node_parents(&roots, |n| n["name"] == "Mobile");
    assert_eq!(paths.len(), 1);
    let names: Vec<_> = paths[0].iter().map(|n| n["name"].clone()).collect();
    assert_eq!(names, [json!("Engineering"), json!("Product"), json!("Mobile")]);

    assert_eq!(get_node_level(&roots, |n| n["name"] == "Mobile"), Some(3));
    assert_eq!(get_node_level(&roots, |n| n["name"] == "QA"), None);

    // Project for a picker: label from the derived field, value from the id.
    let options = process_nodes(&json!(roots), "label", "id").unwrap();
    assert_eq!(options[0]["label"], "ENGINEERING");
    assert_eq!(options[0]["value"], 1);
    assert_eq!(options[0]["children"][1]["children"][0]["label"], "MOBILE");
    // Leaf nodes have no children key at all.
    assert!(options[1].get("children").is_none());
}

#[test]
fn test_clone_preserves_sharing_across_a_document_graph() {
    // One palette shared by two widgets, and a document that knows itself.
    let palette = Value::array_from(vec![Value::Str("#222".into()), Value::Str("#eee".into())]);
    let document = Value::object_from([
        ("header", Value::object_from([("palette", palette.clone())])),
        ("footer", Value::object_from([("palette", palette)])),
    ]);
    if let Value::Object(fields) = &document {
        let root = document.clone();
        fields.borrow_mut().insert("root".to_string(), root);
    }

    let copy = deep_clone(&document).unwrap();
    assert!(structural_eq(&document, &copy));
    assert!(!copy.same_container(&document));

    if let Value::Object(fields) = &copy {
        let fields = fields.borrow();
        assert!(fields["root"].same_container(&copy));

        let header_palette = match &fields["header"] {
            Value::Object(h) => h.borrow()["palette"].clone(),
            _ => unreachable!(),
        };
        let footer_palette = match &fields["footer"] {
            Value::Object(f) => f.borrow()["palette"].clone(),
            _ => unreachable!(),
        };
        assert!(header_palette.same_container(&footer_palette));
    }
}

#[test]
fn test_projection_survives_a_storage_round_trip() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Storage::with_dir(dir.path());

    let roots = valtree::arr_to_tree(&org_records(), &TreeOptions::default());
    let options = process_nodes(&json!(roots), "name", "id").unwrap();

    store.set("picker-options", &options);
    let restored: Vec<serde_json::Value> = store.get("picker-options").unwrap();
    assert_eq!(restored, options);

    store.clear();
    assert!(store.get::<Vec<serde_json::Value>>("picker-options").is_none());
}

#[tokio::test]
async fn test_debounced_rebuild_runs_once_per_burst() {
    let rebuilds = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(Duration::from_millis(20));

    // Five keystrokes arrive faster than the delay.
    for _ in 0..5 {
        let rebuilds = Arc::clone(&rebuilds);
        debouncer.call(move || {
            let roots = valtree::arr_to_tree(&org_records(), &TreeOptions::default());
            assert_eq!(roots.len(), 2);
            rebuilds.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(rebuilds.load(Ordering::SeqCst), 1);
}
