//! Login form scenario
//!
//! Two bound fields with local validators, a submit, and a reset.

use std::cell::Cell;
use std::rc::Rc;

use formtree::foundation::{ErrorKind, Value};
use formtree::store::{FormStore, Validator};

fn required(label: &'static str) -> Validator {
    Validator::new(move |v| {
        if v.is_truthy() {
            String::new()
        } else {
            format!("{label} is required")
        }
    })
}

fn login() -> FormStore {
    FormStore::with_value(Value::object([("username", ""), ("password", "")]))
}

// =============================================================================
// Typing and Submitting
// =============================================================================

#[test]
fn fill_in_and_submit() {
    let store = login();
    let renders = Rc::new(Cell::new(0));
    let on_change = {
        let renders = Rc::clone(&renders);
        move || renders.set(renders.get() + 1)
    };
    let username = store
        .bind("username", required("username"), on_change.clone())
        .unwrap();
    let password = store
        .bind("password", required("password"), on_change)
        .unwrap();

    assert!(!store.is_valid());
    assert_eq!(
        password.error().unwrap().as_deref(),
        Some("password is required")
    );

    username.set_value("ann").unwrap();
    username.set_dirty(true).unwrap();
    password.set_value("hunter2").unwrap();
    assert!(renders.get() >= 2);

    let result = store.submit();
    assert!(result.valid);
    assert_eq!(
        result.values,
        Value::object([("username", "ann"), ("password", "hunter2")])
    );
    assert!(password.dirty().unwrap());
}

#[test]
fn submit_with_errors_marks_everything_dirty() {
    let store = login();
    let username = store.bind("username", required("username"), || {}).unwrap();
    let password = store.bind("password", required("password"), || {}).unwrap();
    assert!(!username.dirty().unwrap());

    let result = store.submit();
    assert!(!result.valid);
    assert!(username.dirty().unwrap());
    assert!(password.dirty().unwrap());
    assert_eq!(
        result.errors,
        Value::object([
            ("username", "username is required"),
            ("password", "password is required"),
        ])
    );
}

#[test]
fn reset_after_edit() {
    let store = login();
    let username = store.bind("username", required("username"), || {}).unwrap();
    username.set_value("ann").unwrap();
    username.set_dirty(true).unwrap();

    store.reset();
    assert_eq!(username.value().unwrap(), Value::from(""));
    assert!(!username.dirty().unwrap());
    assert_eq!(
        username.error().unwrap().as_deref(),
        Some("username is required")
    );
}

// =============================================================================
// Mounting and Unmounting
// =============================================================================

#[test]
fn field_ids_survive_rerenders() {
    let store = login();
    let first = store.bind("username", required("username"), || {}).unwrap();
    let id = first.unique_id().unwrap();
    drop(first);

    let second = store.bind("username", required("username"), || {}).unwrap();
    assert_eq!(second.unique_id().unwrap(), id);
}

#[test]
fn binding_after_store_is_gone() {
    let store = login();
    let username = store.bind("username", required("username"), || {}).unwrap();
    drop(store);

    let err = username.set_value("ann").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingProvider { .. }));
}
