//! Get, set and delete over a value tree addressed by [`Path`].
//!
//! None of these fail on well-formed paths: reads of absent locations yield
//! `None` (or the caller's default) and writes create whatever intermediate
//! containers are missing.

use crate::collections::{Array, Object};
use crate::path::{Path, Segment};
use crate::value::Value;

fn child<'a>(node: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (node, segment) {
        (Value::Object(fields), segment) => fields.get(&segment.field_name()),
        (Value::Array(items), Segment::Index(i)) => items.get(*i),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (node, segment) {
        (Value::Object(fields), segment) => fields.get_mut(&segment.field_name()),
        (Value::Array(items), Segment::Index(i)) => items.get_mut(*i),
        _ => None,
    }
}

/// Empty container that `segment` can step into.
///
/// An index segment gets an array unless `shape` says the same location is an
/// object there, in which case the index addresses the field of the same
/// spelling.
fn container_for(segment: &Segment, shape: Option<&Value>) -> Value {
    match (segment, shape) {
        (Segment::Index(_), Some(Value::Object(_))) | (Segment::Key(_), _) => {
            Value::Object(Object::new())
        }
        (Segment::Index(_), _) => Value::Array(Array::new()),
    }
}

/// Returns the child slot for `segment`, reshaping `node` and creating the
/// child with `fill` as needed.
///
/// A key segment turns any non-object into an empty object. An index segment
/// keeps an object (addressing the field of the same spelling) and turns any
/// other non-array into the container `shape` calls for.
fn slot<'a>(
    node: &'a mut Value,
    segment: &Segment,
    shape: Option<&Value>,
    fill: impl FnOnce() -> Value,
) -> &'a mut Value {
    match (node, segment) {
        (Value::Object(fields), segment) => fields.get_or_insert_with(&segment.field_name(), fill),
        (Value::Array(items), Segment::Index(i)) => items.slot_or_insert_with(*i, fill),
        (node, segment) => {
            *node = container_for(segment, shape);
            slot(node, segment, shape, fill)
        }
    }
}

fn set_with(tree: &mut Value, shape: Option<&Value>, path: &Path, value: Value) {
    let segments = path.segments();
    let mut node = tree;
    let mut shape = shape;
    for (i, segment) in segments.iter().enumerate() {
        let below = shape.and_then(|s| child(s, segment));
        let fill = || match segments.get(i + 1) {
            Some(next) => container_for(next, below),
            None => Value::Nil,
        };
        node = slot(node, segment, shape, fill);
        shape = below;
    }
    *node = value;
}

/// Returns the value at `path`, or `None` if any step is absent.
#[must_use]
pub fn get<'a>(tree: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(tree, |node, segment| child(node, segment))
}

/// Returns a mutable reference to the value at `path`, if present.
pub fn get_mut<'a>(tree: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    let mut node = tree;
    for segment in path.segments() {
        node = child_mut(node, segment)?;
    }
    Some(node)
}

/// Returns a copy of the value at `path`, or `default` if absent.
#[must_use]
pub fn get_or(tree: &Value, path: &Path, default: Value) -> Value {
    get(tree, path).cloned().unwrap_or(default)
}

/// Returns a copy of the value at `path`, or the empty string if absent.
#[must_use]
pub fn get_or_empty(tree: &Value, path: &Path) -> Value {
    get_or(tree, path, Value::from(""))
}

/// Writes `value` at `path`, creating intermediate containers.
///
/// The kind of each created container follows the segment after it: an array
/// in front of an index, an object in front of a key. Writing past the end of
/// an array pads it with `Nil`.
pub fn set(tree: &mut Value, path: &Path, value: Value) {
    set_with(tree, None, path, value);
}

/// Writes `value` at `path` like [`set`], but creates each missing container
/// with the kind `shape` has at the same location.
///
/// Overlay trees that mirror another tree use this so that an object field
/// spelled like an index (`{"5": ..}`) stays an object field instead of
/// turning into a `Nil`-padded array. Where `shape` has no container, the
/// segment decides as in [`set`].
pub fn set_shaped(tree: &mut Value, shape: &Value, path: &Path, value: Value) {
    set_with(tree, Some(shape), path, value);
}

/// Removes the value at `path` and returns it.
///
/// Object fields are removed outright. Array elements are replaced with `Nil`
/// so later indices keep their positions; shifting removal belongs to the
/// store's array operations. Deleting the root leaves `Nil` behind.
pub fn delete(tree: &mut Value, path: &Path) -> Option<Value> {
    let Some(parent) = path.parent() else {
        return Some(std::mem::take(tree));
    };
    let last = path.last()?;
    match (get_mut(tree, &parent)?, last) {
        (Value::Object(fields), segment) => fields.remove(&segment.field_name()),
        (Value::Array(items), Segment::Index(i)) => items.get_mut(*i).map(std::mem::take),
        _ => None,
    }
}
