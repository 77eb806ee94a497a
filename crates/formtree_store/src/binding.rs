//! Per-field bindings.
//!
//! A [`FormItem`] is what a form control holds for one path: it mounts the
//! control's validators and change callback, reads the path's value, dirty
//! flag, error and identifier, and writes back. It points at its store
//! weakly; once the store is gone every access fails with `MissingProvider`.

use std::fmt;

use formtree_foundation::{Error, IntoPath, Path, Result, Value};
use tracing::debug;

use crate::store::{FormStore, WeakStore};
use crate::subscription::{ItemSubscription, Subscription};
use crate::validator::IntoValidators;

/// Handle to one path of a [`FormStore`].
///
/// Dropping it unmounts its validators and its change callback.
pub struct FormItem {
    store: WeakStore,
    path: Path,
    _observer: Subscription,
    _item: ItemSubscription,
}

impl FormStore {
    /// Binds a form control to `path`.
    ///
    /// Mounts `validators` (validating the current value immediately) and
    /// registers `on_change` as an observer of `path`.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn bind(
        &self,
        path: impl IntoPath,
        validators: impl IntoValidators,
        on_change: impl Fn() + 'static,
    ) -> Result<FormItem> {
        let path = path.into_path().map_err(|e| e.in_operation("bind"))?;
        debug!(path = %path, "binding form item");
        let observer = self.subscribe_observer(&path, on_change)?;
        let item = self.subscribe_item(&path, validators)?;
        Ok(FormItem {
            store: self.downgrade(),
            path,
            _observer: observer,
            _item: item,
        })
    }
}

impl FormItem {
    fn store(&self, operation: &'static str) -> Result<FormStore> {
        self.store
            .upgrade()
            .ok_or_else(|| Error::missing_provider(self.path.clone()).in_operation(operation))
    }

    /// Returns the bound path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current value.
    ///
    /// # Errors
    ///
    /// Returns `MissingProvider` if the store has been dropped.
    pub fn value(&self) -> Result<Value> {
        self.store("value")?.get_value(&self.path)
    }

    /// Returns true if the field is dirty.
    ///
    /// # Errors
    ///
    /// Returns `MissingProvider` if the store has been dropped.
    pub fn dirty(&self) -> Result<bool> {
        self.store("dirty")?.is_dirty(&self.path)
    }

    /// Returns the current error message, if any.
    ///
    /// # Errors
    ///
    /// Returns `MissingProvider` if the store has been dropped.
    pub fn error(&self) -> Result<Option<String>> {
        self.store("error")?.error_message(&self.path)
    }

    /// Returns the field's identifier.
    ///
    /// # Errors
    ///
    /// Returns `MissingProvider` if the store has been dropped.
    pub fn unique_id(&self) -> Result<String> {
        self.store("unique_id")?.get_unique_id(&self.path)
    }

    /// Writes a new value.
    ///
    /// # Errors
    ///
    /// Returns `MissingProvider` if the store has been dropped.
    pub fn set_value(&self, value: impl Into<Value>) -> Result<()> {
        self.store("set_value")?.set_value(&self.path, value)
    }

    /// Sets the dirty flag.
    ///
    /// # Errors
    ///
    /// Returns `MissingProvider` if the store has been dropped.
    pub fn set_dirty(&self, dirty: bool) -> Result<()> {
        self.store("set_dirty")?.set_dirty(&self.path, dirty)
    }
}

impl fmt::Debug for FormItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormItem")
            .field("path", &self.path)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
