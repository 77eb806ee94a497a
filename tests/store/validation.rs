//! Integration tests for local and global validation

use formtree_foundation::{Path, Value, access};
use formtree_store::{FormStore, StoreConfig, Validator};

fn required() -> Validator {
    Validator::new(|v| {
        if v.is_truthy() {
            String::new()
        } else {
            "required".to_string()
        }
    })
}

fn min_len(n: usize) -> Validator {
    Validator::new(move |v| match v.as_str() {
        Some(s) if s.chars().count() < n => format!("at least {n} characters"),
        _ => String::new(),
    })
}

// =============================================================================
// Local Validators
// =============================================================================

#[test]
fn required_password() {
    let store = FormStore::with_value(Value::object([("password", "x")]));
    let _item = store.subscribe_item("password", required()).unwrap();
    assert!(store.is_valid());

    store.set_value("password", "").unwrap();
    assert_eq!(store.get_error("password").unwrap(), Value::from("required"));
    assert!(!store.is_valid());
}

#[test]
fn first_failing_validator_wins() {
    let store = FormStore::with_value(Value::object([("name", "")]));
    let _item = store
        .subscribe_item("name", vec![required(), min_len(3)])
        .unwrap();
    assert_eq!(store.get_error("name").unwrap(), Value::from("required"));

    store.set_value("name", "ab").unwrap();
    assert_eq!(
        store.get_error("name").unwrap(),
        Value::from("at least 3 characters")
    );

    store.set_value("name", "abc").unwrap();
    assert_eq!(store.get_error("name").unwrap(), Value::from(""));
}

#[test]
fn validators_on_other_paths_are_untouched() {
    let store = FormStore::with_value(Value::object([("a", ""), ("b", "")]));
    let a = store.subscribe_item("a", required()).unwrap();
    let _b = store.subscribe_item("b", required()).unwrap();
    drop(a);

    store.set_value("a", "").unwrap();
    store.set_value("b", "").unwrap();
    assert_eq!(store.get_error("a").unwrap(), Value::from(""));
    assert_eq!(store.get_error("b").unwrap(), Value::from("required"));
}

#[test]
fn validity_tracks_every_invalid_path() {
    let store = FormStore::with_value(Value::object([("a", ""), ("b", "")]));
    let _a = store.subscribe_item("a", required()).unwrap();
    let _b = store.subscribe_item("b", required()).unwrap();
    assert_eq!(store.invalid_paths().len(), 2);

    store.set_value("a", "x").unwrap();
    assert!(!store.is_valid());
    store.set_value("b", "y").unwrap();
    assert!(store.is_valid());
}

#[test]
fn validation_failure_is_not_an_error() {
    let store = FormStore::default();
    let _item = store.subscribe_item("email", required()).unwrap();
    assert!(store.set_value("email", "").is_ok());
}

// =============================================================================
// Global Validator
// =============================================================================

fn matching_passwords() -> StoreConfig {
    StoreConfig::new()
        .with_init_value(Value::object([("password", ""), ("confirm", "")]))
        .with_validate(|values, _errors| {
            let password = access::get_or_empty(values, &Path::root().key("password"));
            let confirm = access::get_or_empty(values, &Path::root().key("confirm"));
            let message = if password == confirm {
                ""
            } else {
                "passwords differ"
            };
            Value::object([("confirm", message)])
        })
}

#[test]
fn global_validator_runs_on_every_write() {
    let store = FormStore::new(matching_passwords());
    store.set_value("password", "secret").unwrap();
    assert_eq!(
        store.get_error("confirm").unwrap(),
        Value::from("passwords differ")
    );
    assert!(!store.is_valid());

    store.set_value("confirm", "secret").unwrap();
    assert!(store.is_valid());
}

#[test]
fn global_validator_sees_current_errors() {
    let store = FormStore::new(
        StoreConfig::new()
            .with_init_value(Value::object([("a", "")]))
            .with_validate(|_values, errors| {
                let local = access::get_or_empty(errors, &Path::root().key("a"));
                let summary = if local.is_truthy() { "fix a" } else { "" };
                Value::object([("summary", summary)])
            }),
    );
    let _item = store.subscribe_item("a", required()).unwrap();
    assert_eq!(store.get_error("summary").unwrap(), Value::from("fix a"));

    store.set_value("a", "ok").unwrap();
    assert_eq!(store.get_error("summary").unwrap(), Value::from(""));
    assert!(store.is_valid());
}

#[test]
fn direct_error_writes() {
    let store = FormStore::with_value(Value::object([("user", "ann")]));
    store.set_error("user", "already taken").unwrap();
    assert_eq!(
        store.error_message("user").unwrap().as_deref(),
        Some("already taken")
    );
    assert!(!store.is_valid());

    store.set_error("user", "").unwrap();
    assert!(store.is_valid());
}
