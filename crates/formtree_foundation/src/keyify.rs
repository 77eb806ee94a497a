//! Leaf path enumeration.

use crate::path::Path;
use crate::value::Value;

/// Lists every leaf path of `value`, in field and element order.
///
/// Non-empty arrays and objects are expanded; `Nil` and scalars are leaves.
/// Empty arrays and empty objects contribute no path at all. A scalar root
/// yields the root path.
///
/// ```
/// use formtree_foundation::{keyify, Value};
///
/// let tree = Value::object([
///     ("a", Value::object([("b", Value::Int(1))])),
///     ("c", Value::empty_array()),
/// ]);
/// let paths: Vec<String> = keyify(&tree).iter().map(ToString::to_string).collect();
/// assert_eq!(paths, vec!["a.b"]);
/// ```
#[must_use]
pub fn keyify(value: &Value) -> Vec<Path> {
    let mut paths = Vec::new();
    collect(value, Path::root(), &mut paths);
    paths
}

fn collect(value: &Value, prefix: Path, out: &mut Vec<Path>) {
    match value {
        Value::Array(items) if items.is_empty() => {}
        Value::Object(fields) if fields.is_empty() => {}
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect(item, prefix.index(i), out);
            }
        }
        Value::Object(fields) => {
            for (key, field) in fields.iter() {
                collect(field, prefix.key(key), out);
            }
        }
        Value::Nil | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
            out.push(prefix);
        }
    }
}
