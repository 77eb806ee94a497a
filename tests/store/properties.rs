//! Property tests for store invariants

use formtree_foundation::{Path, Value, access, keyify};
use formtree_store::FormStore;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    SetError(usize, usize, bool),
    SetValue(usize, usize, i64),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 0..2usize, any::<bool>()).prop_map(|(r, f, bad)| Op::SetError(r, f, bad)),
        (0..3usize, 0..2usize, any::<i64>()).prop_map(|(r, f, v)| Op::SetValue(r, f, v)),
        (0..3usize).prop_map(Op::Remove),
    ]
}

fn field(row: usize, f: usize) -> Path {
    Path::root()
        .key("rows")
        .index(row)
        .key(if f == 0 { "name" } else { "qty" })
}

fn truthy_error_leaves(errors: &Value) -> Vec<Path> {
    keyify(errors)
        .into_iter()
        .filter(|p| access::get(errors, p).is_some_and(Value::is_truthy))
        .collect()
}

proptest! {
    #[test]
    fn invalid_set_matches_error_tree(ops in prop::collection::vec(op(), 0..30)) {
        let store = FormStore::with_value(Value::object([(
            "rows",
            Value::array((0..3).map(|i| Value::object([("name", Value::from("")), ("qty", Value::Int(i))]))),
        )]));

        for op in ops {
            match op {
                Op::SetError(r, f, bad) => {
                    store.set_error(field(r, f), if bad { "bad" } else { "" }).unwrap();
                }
                Op::SetValue(r, f, v) => store.set_value(field(r, f), v).unwrap(),
                Op::Remove(i) => {
                    // Rows may already be gone; only the invariant matters here.
                    let _ = store.array_remove("rows", i);
                }
            }
            let mut expected = truthy_error_leaves(&store.errors());
            expected.sort();
            prop_assert_eq!(store.invalid_paths(), expected.clone());
            prop_assert_eq!(store.is_valid(), expected.is_empty());
        }
    }

    #[test]
    fn set_then_get(row in 0..5usize, v in any::<i64>()) {
        let store = FormStore::default();
        let path = field(row, 1);
        store.set_value(&path, v).unwrap();
        prop_assert_eq!(store.get_value(&path).unwrap(), Value::Int(v));
    }
}
