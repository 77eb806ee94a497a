//! Integration tests for array operations

use formtree_foundation::{ErrorKind, Value};
use formtree_store::FormStore;

fn abc() -> FormStore {
    FormStore::with_value(Value::object([("items", Value::array(["a", "b", "c"]))]))
}

#[test]
fn remove_middle_element() {
    let store = abc();
    let id2 = store.get_unique_id("items[2]").unwrap();

    store.array_remove("items", 1).unwrap();
    assert_eq!(store.get_value("items").unwrap(), Value::array(["a", "c"]));
    assert_eq!(store.get_unique_id("items[1]").unwrap(), id2);
}

#[test]
fn push_gets_fresh_id() {
    let store = FormStore::with_value(Value::object([("items", Value::array(["a", "b"]))]));
    let id0 = store.get_unique_id("items[0]").unwrap();
    let id1 = store.get_unique_id("items[1]").unwrap();

    store.array_push("items", "x").unwrap();
    assert_eq!(
        store.get_value("items").unwrap(),
        Value::array(["a", "b", "x"])
    );
    let id2 = store.get_unique_id("items[2]").unwrap();
    assert_ne!(id2, id0);
    assert_ne!(id2, id1);
}

#[test]
fn remove_errors() {
    let store = abc();
    assert!(matches!(
        store.array_remove("items[0]", 0).unwrap_err().kind,
        ErrorKind::NotAnArray { .. }
    ));
    assert!(matches!(
        store.array_remove("items", 3).unwrap_err().kind,
        ErrorKind::IndexOutOfBounds { .. }
    ));
}

#[test]
fn rows_of_objects_stay_aligned() {
    let store = FormStore::with_value(Value::object([(
        "rows",
        Value::array([
            Value::object([("qty", 1)]),
            Value::object([("qty", 0)]),
            Value::object([("qty", 3)]),
        ]),
    )]));
    store.set_error("rows[1].qty", "must be positive").unwrap();
    store.set_dirty("rows[2].qty", true).unwrap();

    store.array_remove("rows", 0).unwrap();
    assert_eq!(
        store.get_error("rows[0].qty").unwrap(),
        Value::from("must be positive")
    );
    assert!(store.is_dirty("rows[1].qty").unwrap());
    assert!(!store.is_valid());

    store.array_remove("rows", 0).unwrap();
    assert!(store.is_valid());
    assert_eq!(
        store.get_value("rows").unwrap(),
        Value::array([Value::object([("qty", 3)])])
    );
}

#[test]
fn blank_push_reports_next_index() {
    let store = abc();
    assert_eq!(store.array_push_blank("items").unwrap(), 3);
    assert_eq!(store.array_push_blank("missing").unwrap(), 0);
    assert_eq!(store.get_value("items").unwrap(), Value::array(["a", "b", "c"]));
}
