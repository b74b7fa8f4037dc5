//! Mapping serialization of list groupings: ordered arrays, append
//! shorthand, namespace-prefixed list names, and append-integrity
//! validation.

use elem_json::{MappingOptions, MappingSerializer};
use elem_tree::{Document, Error};
use serde_json::json;

fn to_map(doc: &Document) -> serde_json::Value {
    MappingSerializer::new(doc).serialize(doc.root_id()).unwrap()
}

#[test]
fn test_direct_list() {
    let mut doc = Document::new();
    doc.root().child("a").at(0).unwrap().value("000");
    doc.root().child("a").at(1).unwrap().value("111");

    assert_eq!(json!({"a": ["000", "111"]}), to_map(&doc));
}

#[test]
fn test_direct_list_without_values() {
    let mut doc = Document::new();
    doc.root().child("a").at(0).unwrap();
    doc.root().child("a").at(1).unwrap();

    assert_eq!(json!({"a": [null, null]}), to_map(&doc));
}

#[test]
fn test_indirect_list() {
    let mut doc = Document::new();
    doc.root().child("a").child("b").at(0).unwrap().value("000");
    doc.root().child("a").child("b").at(1).unwrap().value("111");

    assert_eq!(json!({"a": {"b": ["000", "111"]}}), to_map(&doc));
}

#[test]
fn test_list_with_value_holes() {
    let mut doc = Document::new();
    doc.root().child("a").at(0).unwrap().value("a0");
    doc.root().child("a").at(1).unwrap();
    doc.root().child("a").at(2).unwrap().value("a2");

    assert_eq!(json!({"a": ["a0", null, "a2"]}), to_map(&doc));
}

#[test]
fn test_promotion_removes_bare_scalar_key() {
    let mut doc = Document::new();
    doc.root().child("a").at(0).unwrap().value("x");

    // After promotion `a` only ever appears as a list.
    assert_eq!(json!({"a": ["x"]}), to_map(&doc));
}

#[test]
fn test_list_members_with_subtrees() {
    let mut doc = Document::new();
    doc.root()
        .child("a")
        .at(0)
        .unwrap()
        .child("b")
        .child("c")
        .set("d", "ddd");
    doc.root().child("a").at(1).unwrap();
    doc.root().child("a").at(2).unwrap();

    assert_eq!(
        json!({"a": [{"b": {"c": {"d": "ddd"}}}, null, null]}),
        to_map(&doc)
    );
}

#[test]
fn test_mixed_scalars_and_lists() {
    let mut doc = Document::new();
    doc.root().set("a", "a-value");
    doc.root().child("b").at(0).unwrap().value("b0-value");
    doc.root().child("b").at(1).unwrap().value("b1-value");
    doc.root()
        .child("b")
        .at(1)
        .unwrap()
        .child("c")
        .at(0)
        .unwrap()
        .set("d", "d-value");

    assert_eq!(
        json!({
            "a": "a-value",
            "b": ["b0-value", {"c": [{"d": "d-value"}], "text": "b1-value"}]
        }),
        to_map(&doc)
    );
}

#[test]
fn test_append_shorthand() {
    let mut doc = Document::new();
    doc.root().child("a").append(123);
    doc.root().child("a").append(456);
    doc.root().child("a").at(2).unwrap().value(789);

    assert_eq!(json!({"a": [123, 456, 789]}), to_map(&doc));
}

#[test]
fn test_append_with_ns_prefix() {
    let mut doc = Document::new();
    doc.root().merge_ns([("ns0", "example.com")]);
    doc.root().child("ns0_a").at(0).unwrap().value(0);
    doc.root().child("ns0_a").append(123);

    let opts = MappingOptions {
        include_ns: true,
        ..MappingOptions::default()
    };
    let out = MappingSerializer::with_options(&doc, opts)
        .serialize(doc.root_id())
        .unwrap();
    assert_eq!(json!({"ns0_a": [0, 123]}), out);

    // Default output drops the prefix from the list key.
    assert_eq!(json!({"a": [0, 123]}), to_map(&doc));
}

#[test]
fn test_two_lists_under_one_node() {
    let mut doc = Document::new();
    doc.root().merge_ns([("ns0", "example.com")]);
    doc.root().child("ns0_a").at(0).unwrap().value("000");
    doc.root().child("b").at(0).unwrap().value("111");

    let opts = MappingOptions {
        include_ns: true,
        ..MappingOptions::default()
    };
    let out = MappingSerializer::with_options(&doc, opts)
        .serialize(doc.root_id())
        .unwrap();
    assert_eq!(json!({"ns0_a": ["000"], "b": ["111"]}), out);
}

#[test]
fn test_append_integrity_on_local_name_collision() {
    // Two list groupings whose names only differ by prefix collapse onto
    // one output key once prefixes are dropped; the append check catches
    // the resulting position mismatch.
    let mut doc = Document::new();
    doc.root().merge_ns([("x", "example.com")]);
    doc.root().child("a").child("x_b").at(0).unwrap().value("000");
    doc.root().child("a").child("b").at(0).unwrap().value("111");

    let err = MappingSerializer::new(&doc)
        .serialize(doc.root_id())
        .unwrap_err();
    match &err {
        Error::UnexpectedAppend { idx, name, .. } => {
            assert_eq!(*idx, 0);
            assert_eq!(name, "b");
        }
        other => panic!("expected UnexpectedAppend, got {:?}", other),
    }
    let message = err.to_string();
    assert!(message.starts_with("Unexpected input (append), idx:`0`, name:`b`"));
    assert!(message.contains("out:`{\"b\":[\"000\"]}`"));

    // With prefixes retained the collision disappears.
    let opts = MappingOptions {
        include_ns: true,
        ..MappingOptions::default()
    };
    let out = MappingSerializer::with_options(&doc, opts)
        .serialize(doc.root_id())
        .unwrap();
    assert_eq!(json!({"a": {"x_b": ["000"], "b": ["111"]}}), out);
}
