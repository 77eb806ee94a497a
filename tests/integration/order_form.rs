//! Order form scenario
//!
//! A dynamic list of rows with a whole-form validator and positional row ids.

use formtree::foundation::{Path, Value, access};
use formtree::store::{FormStore, StoreConfig, Validator};

fn row(name: &str, qty: i64) -> Value {
    Value::object([("name", Value::from(name)), ("qty", Value::Int(qty))])
}

/// Flags the total when it exceeds 10.
fn order_store(rows: Vec<Value>) -> FormStore {
    FormStore::new(
        StoreConfig::new()
            .with_init_value(Value::object([("rows", Value::array(rows))]))
            .with_validate(|values, _| {
                let total: i64 = access::get(values, &Path::root().key("rows"))
                    .and_then(Value::as_array)
                    .map(|rows| {
                        rows.iter()
                            .filter_map(|r| access::get(r, &Path::root().key("qty")))
                            .filter_map(Value::as_int)
                            .sum()
                    })
                    .unwrap_or(0);
                let message = if total > 10 { "order too large" } else { "" };
                Value::object([("total", message)])
            }),
    )
}

fn positive() -> Validator {
    Validator::new(|v| match v.as_int() {
        Some(n) if n > 0 => String::new(),
        _ => "must be positive".to_string(),
    })
}

// =============================================================================
// Adding and Removing Rows
// =============================================================================

#[test]
fn add_rows_until_too_large() {
    let store = order_store(vec![row("pen", 4)]);
    assert!(store.is_valid());

    let index = store.array_push("rows", row("ink", 5)).unwrap();
    assert_eq!(index, 1);
    assert!(store.is_valid());

    store.array_push("rows", row("pad", 2)).unwrap();
    assert_eq!(
        store.get_error("total").unwrap(),
        Value::from("order too large")
    );
    assert!(!store.is_valid());

    store.array_remove("rows", 1).unwrap();
    store.set_value("rows[0].qty", 4).unwrap();
    assert!(store.is_valid());
}

#[test]
fn row_ids_follow_their_position() {
    let store = order_store(vec![row("a", 1), row("b", 1), row("c", 1)]);
    let ids: Vec<String> = (0..3)
        .map(|i| store.get_unique_id(Path::root().key("rows").index(i)).unwrap())
        .collect();

    store.array_remove("rows", 0).unwrap();
    assert_eq!(store.get_unique_id("rows[0]").unwrap(), ids[1]);
    assert_eq!(store.get_unique_id("rows[1]").unwrap(), ids[2]);

    store.array_push("rows", row("d", 1)).unwrap();
    let fresh = store.get_unique_id("rows[2]").unwrap();
    assert!(!ids.contains(&fresh));
}

#[test]
fn row_validators_move_with_the_path_not_the_row() {
    let store = order_store(vec![row("a", 1), row("b", 0)]);
    let _qty0 = store.bind("rows[0].qty", positive(), || {}).unwrap();
    let _qty1 = store.bind("rows[1].qty", positive(), || {}).unwrap();
    assert_eq!(
        store.invalid_paths(),
        vec![Path::parse("rows[1].qty").unwrap()]
    );

    store.array_remove("rows", 0).unwrap();
    assert_eq!(
        store.get_error("rows[0].qty").unwrap(),
        Value::from("must be positive")
    );
    assert!(!store.is_valid());

    store.set_value("rows[0].qty", 2).unwrap();
    assert!(store.is_valid());
}

#[test]
fn dump_describes_whole_form() {
    let store = order_store(vec![row("pen", 1)]);
    store.get_unique_id("rows[0]").unwrap();
    let dump = store.dump();
    assert!(dump.valid);
    assert_eq!(dump.values, store.values());
    assert!(dump.to_string().contains("pen"));
}
