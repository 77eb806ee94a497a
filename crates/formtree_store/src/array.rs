//! Array-aware mutation.
//!
//! Arrays are stored positionally in all four trees, so pushing and removing
//! keep values, dirty flags, errors and identifiers aligned by index.

use formtree_foundation::{Array, Error, IntoPath, Path, Result, Value, ValueKind, access};
use tracing::debug;

use crate::store::FormStore;

/// Length of the array at `path`, or 0 if there is no array there.
fn array_len(tree: &Value, path: &Path) -> usize {
    access::get(tree, path)
        .and_then(Value::as_array)
        .map_or(0, Array::len)
}

/// Removes element `index` from the array at `path`, if there is one.
fn remove_at(tree: &mut Value, path: &Path, index: usize) {
    if let Some(array) = access::get_mut(tree, path).and_then(Value::as_array_mut) {
        array.remove(index);
    }
}

impl FormStore {
    /// Appends `value` to the array at `path` and returns its index.
    ///
    /// The element is written through [`set_value`](Self::set_value), so it is
    /// validated and the global observers fire. The observers of `path` fire
    /// afterwards. An absent or non-array value at `path` counts as empty.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn array_push(&self, path: impl IntoPath, value: impl Into<Value>) -> Result<usize> {
        let path = path.into_path().map_err(|e| e.in_operation("array_push"))?;
        let index = array_len(&self.shared.state.borrow().values, &path);
        debug!(path = %path, index, "array push");
        self.write_value(&path.index(index), value.into());
        self.notify(&path, false);
        Ok(index)
    }

    /// Signals that a blank element is being appended at `path` without
    /// writing one, and returns the index it would take.
    ///
    /// Only the observers of `path` fire. The element comes into existence on
    /// the first write to `path[index]`.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn array_push_blank(&self, path: impl IntoPath) -> Result<usize> {
        let path = path
            .into_path()
            .map_err(|e| e.in_operation("array_push_blank"))?;
        let index = array_len(&self.shared.state.borrow().values, &path);
        debug!(path = %path, index, "array push (blank)");
        self.notify(&path, false);
        Ok(index)
    }

    /// Removes element `index` from the array at `path` in every tree,
    /// shifting later elements down, and returns the removed value.
    ///
    /// Identifiers are positional: the identifier that was at `index + 1`
    /// is now at `index`. Fires the global observers and then the observers
    /// of `path`.
    ///
    /// # Errors
    ///
    /// Returns `NotAnArray` if the value at `path` is not an array and
    /// `IndexOutOfBounds` if `index` is past its end.
    pub fn array_remove(&self, path: impl IntoPath, index: usize) -> Result<Value> {
        let path = path
            .into_path()
            .map_err(|e| e.in_operation("array_remove"))?;
        let removed = {
            let mut state = self.shared.state.borrow_mut();
            let state = &mut *state;
            let array = match access::get_mut(&mut state.values, &path) {
                Some(Value::Array(array)) => array,
                other => {
                    let actual = other.map_or(ValueKind::Nil, |v| v.kind());
                    return Err(Error::not_an_array(path, actual).in_operation("array_remove"));
                }
            };
            let length = array.len();
            let Some(removed) = array.remove(index) else {
                return Err(
                    Error::index_out_of_bounds(path, index, length).in_operation("array_remove")
                );
            };
            remove_at(&mut state.dirty, &path, index);
            remove_at(&mut state.errors, &path, index);
            remove_at(&mut state.ids, &path, index);
            state.sync_invalid(&path);
            removed
        };
        debug!(path = %path, index, "array remove");
        self.notify(&path, true);
        Ok(removed)
    }
}
