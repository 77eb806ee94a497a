//! Diagnostic dump of a store.

use std::fmt;

use formtree_foundation::{Path, Value};
use tracing::info;

use crate::store::FormStore;

/// A point-in-time copy of everything a store tracks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreDump {
    /// Value tree.
    pub values: Value,
    /// Dirty tree.
    pub dirty: Value,
    /// Error tree.
    pub errors: Value,
    /// Whether no path carries an error.
    pub valid: bool,
    /// Paths carrying an error.
    pub invalid_paths: Vec<Path>,
    /// Identifier tree.
    pub ids: Value,
}

impl fmt::Display for StoreDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "values:  {}", self.values)?;
        writeln!(f, "dirty:   {}", self.dirty)?;
        writeln!(f, "errors:  {}", self.errors)?;
        write!(f, "valid:   {}", self.valid)?;
        if !self.invalid_paths.is_empty() {
            let paths: Vec<String> = self.invalid_paths.iter().map(ToString::to_string).collect();
            write!(f, " (invalid: {})", paths.join(", "))?;
        }
        writeln!(f)?;
        write!(f, "ids:     {}", self.ids)
    }
}

impl FormStore {
    /// Returns a copy of every tree plus the validity state.
    #[must_use]
    pub fn dump(&self) -> StoreDump {
        let state = self.shared.state.borrow();
        StoreDump {
            values: state.values.clone(),
            dirty: state.dirty.clone(),
            errors: state.errors.clone(),
            valid: state.invalid.is_empty(),
            invalid_paths: state.invalid.iter().cloned().collect(),
            ids: state.ids.clone(),
        }
    }

    /// Emits the dump as an `info` event.
    pub fn log(&self) {
        let dump = self.dump();
        info!(
            values = %dump.values,
            dirty = %dump.dirty,
            errors = %dump.errors,
            valid = dump.valid,
            ids = %dump.ids,
            "form store state"
        );
    }
}
