//! The form store.
//!
//! A [`FormStore`] owns four parallel trees addressed by the same paths:
//! values, dirty flags, error messages and item identifiers. It also owns the
//! set of invalid paths, the validator registry and the observer hub. All
//! mutation goes through its methods.
//!
//! # Invariants
//!
//! 1. The invalid-path set is exactly the set of leaf paths of the error tree
//!    holding a truthy message, and the store is valid iff that set is empty.
//! 2. No internal borrow is held while a validator, the global validator or
//!    an observer runs, so all three may call back into the store.
//! 3. Observers are notified from a snapshot of their channel taken when the
//!    notification starts.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use formtree_foundation::{IntoPath, Path, Result, Value, access, keyify};
use tracing::{debug, trace};

use crate::config::{GlobalValidator, StoreConfig};
use crate::identity::IdGenerator;
use crate::observer::ObserverHub;
use crate::subscription::{ItemSubscription, Subscription};
use crate::validator::{self, IntoValidators, ValidatorRegistry};

/// The trees a store tracks.
pub(crate) struct StoreState {
    pub(crate) values: Value,
    pub(crate) dirty: Value,
    pub(crate) errors: Value,
    pub(crate) ids: Value,
    pub(crate) init: Value,
    pub(crate) invalid: BTreeSet<Path>,
}

impl StoreState {
    fn new(init: Value) -> Self {
        Self {
            values: init.clone(),
            dirty: Value::empty_object(),
            errors: Value::empty_object(),
            ids: Value::empty_object(),
            init,
            invalid: BTreeSet::new(),
        }
    }

    /// Writes a dirty flag, creating containers shaped like the value tree.
    fn put_dirty(&mut self, path: &Path, dirty: Value) {
        access::set_shaped(&mut self.dirty, &self.values, path, dirty);
    }

    /// Writes an error entry, creating containers shaped like the value tree.
    fn put_error(&mut self, path: &Path, message: Value) {
        access::set_shaped(&mut self.errors, &self.values, path, message);
    }

    fn put_id(&mut self, path: &Path, id: Value) {
        access::set_shaped(&mut self.ids, &self.values, path, id);
    }

    /// Brings the invalid set back in line with the error tree after a write
    /// at or below `base`.
    pub(crate) fn sync_invalid(&mut self, base: &Path) {
        let errors = &self.errors;
        self.invalid.retain(|path| {
            if path.starts_with(base) {
                false
            } else if base.starts_with(path) {
                // An ancestor stays listed only while it is still a leaf.
                access::get(errors, path).is_some_and(is_error_leaf)
            } else {
                true
            }
        });

        let Some(node) = access::get(errors, base) else {
            return;
        };
        for leaf in keyify(node) {
            if access::get(node, &leaf).is_some_and(is_error_leaf) {
                self.invalid.insert(base.join(&leaf));
            }
        }
    }
}

fn is_error_leaf(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_)) && value.is_truthy()
}

/// State shared between a store and the handles that point back at it.
pub(crate) struct Shared {
    pub(crate) state: RefCell<StoreState>,
    pub(crate) validators: RefCell<ValidatorRegistry>,
    pub(crate) observers: RefCell<ObserverHub>,
    pub(crate) global_validator: Option<GlobalValidator>,
    pub(crate) ids: IdGenerator,
}

/// Options for [`FormStore::initialize`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InitOptions {
    /// Also make the new tree the snapshot restored by reset.
    pub replace_snapshot: bool,
    /// Leave dirty flags as they are instead of clearing them.
    pub keep_dirty: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            replace_snapshot: true,
            keep_dirty: false,
        }
    }
}

impl InitOptions {
    /// Builder method to set whether the reset snapshot is replaced.
    #[must_use]
    pub fn with_replace_snapshot(mut self, replace: bool) -> Self {
        self.replace_snapshot = replace;
        self
    }

    /// Builder method to set whether dirty flags survive.
    #[must_use]
    pub fn with_keep_dirty(mut self, keep: bool) -> Self {
        self.keep_dirty = keep;
        self
    }
}

/// Result of [`FormStore::submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// Whether every path passed validation.
    pub valid: bool,
    /// The value tree at submit time.
    pub values: Value,
    /// The error tree at submit time.
    pub errors: Value,
}

/// Reactive store for one logical form.
///
/// `FormStore` is a handle: clones refer to the same store. The store is
/// single-threaded (`!Send`) and every operation runs to completion before
/// returning. Callbacks that need the store should capture a [`WeakStore`]
/// so the store can be dropped while they are still registered.
#[derive(Clone)]
pub struct FormStore {
    pub(crate) shared: Rc<Shared>,
}

/// Non-owning handle to a [`FormStore`].
#[derive(Clone)]
pub struct WeakStore {
    shared: Weak<Shared>,
}

impl WeakStore {
    /// Returns the store if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<FormStore> {
        self.shared.upgrade().map(|shared| FormStore { shared })
    }
}

impl fmt::Debug for WeakStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl fmt::Debug for FormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("FormStore")
            .field("values", &state.values)
            .field("dirty", &state.dirty)
            .field("errors", &state.errors)
            .field("valid", &state.invalid.is_empty())
            .finish_non_exhaustive()
    }
}

impl FormStore {
    /// Creates a store from `config` and runs validation over the initial
    /// value tree.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        let StoreConfig {
            init_value,
            validate,
            id_prefix,
        } = config;
        let store = Self {
            shared: Rc::new(Shared {
                state: RefCell::new(StoreState::new(init_value.clone())),
                validators: RefCell::new(ValidatorRegistry::new()),
                observers: RefCell::new(ObserverHub::new()),
                global_validator: validate,
                ids: IdGenerator::new(id_prefix),
            }),
        };
        store.initialize_with(init_value, InitOptions::default());
        store
    }

    /// Creates a store seeded with `init_value` and no global validator.
    #[must_use]
    pub fn with_value(init_value: impl Into<Value>) -> Self {
        Self::new(StoreConfig::new().with_init_value(init_value))
    }

    /// Returns a non-owning handle to this store.
    #[must_use]
    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Returns true if both handles refer to the same store.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the value at `path`, or the empty string if absent.
    ///
    /// The root path (`""`) returns the whole value tree.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn get_value(&self, path: impl IntoPath) -> Result<Value> {
        let path = path.into_path().map_err(|e| e.in_operation("get_value"))?;
        Ok(access::get_or_empty(&self.shared.state.borrow().values, &path))
    }

    /// Returns the dirty flag (or dirty subtree) at `path`, `false` if absent.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn get_dirty(&self, path: impl IntoPath) -> Result<Value> {
        let path = path.into_path().map_err(|e| e.in_operation("get_dirty"))?;
        Ok(access::get_or(
            &self.shared.state.borrow().dirty,
            &path,
            Value::Bool(false),
        ))
    }

    /// Returns true if the dirty flag at `path` is truthy.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn is_dirty(&self, path: impl IntoPath) -> Result<bool> {
        Ok(self.get_dirty(path)?.is_truthy())
    }

    /// Returns the error message (or error subtree) at `path`, or the empty
    /// string if absent.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn get_error(&self, path: impl IntoPath) -> Result<Value> {
        let path = path.into_path().map_err(|e| e.in_operation("get_error"))?;
        Ok(access::get_or_empty(&self.shared.state.borrow().errors, &path))
    }

    /// Returns the error message at `path` if it is a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn error_message(&self, path: impl IntoPath) -> Result<Option<String>> {
        Ok(match self.get_error(path)? {
            Value::String(s) if !s.is_empty() => Some(s.to_string()),
            _ => None,
        })
    }

    /// Returns true if no path currently carries an error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.shared.state.borrow().invalid.is_empty()
    }

    /// Returns the paths currently carrying an error, in path order.
    #[must_use]
    pub fn invalid_paths(&self) -> Vec<Path> {
        self.shared.state.borrow().invalid.iter().cloned().collect()
    }

    /// Returns the whole value tree.
    #[must_use]
    pub fn values(&self) -> Value {
        self.shared.state.borrow().values.clone()
    }

    /// Returns the whole dirty tree.
    #[must_use]
    pub fn dirty_tree(&self) -> Value {
        self.shared.state.borrow().dirty.clone()
    }

    /// Returns the whole error tree.
    #[must_use]
    pub fn errors(&self) -> Value {
        self.shared.state.borrow().errors.clone()
    }

    /// Returns the snapshot restored by [`reset`](Self::reset).
    #[must_use]
    pub fn init_snapshot(&self) -> Value {
        self.shared.state.borrow().init.clone()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Writes `value` at `path`, validates, and notifies observers.
    ///
    /// Runs the path's local validators and stores their message in the error
    /// tree, runs the global validator (if any) and merges its error tree,
    /// then fires the global observers followed by the observers of `path`.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn set_value(&self, path: impl IntoPath, value: impl Into<Value>) -> Result<()> {
        let path = path.into_path().map_err(|e| e.in_operation("set_value"))?;
        self.write_value(&path, value.into());
        Ok(())
    }

    /// Writes a dirty flag. Does not validate or notify.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn set_dirty(&self, path: impl IntoPath, dirty: impl Into<Value>) -> Result<()> {
        let path = path.into_path().map_err(|e| e.in_operation("set_dirty"))?;
        self.shared.state.borrow_mut().put_dirty(&path, dirty.into());
        Ok(())
    }

    /// Writes an error message directly and notifies the path's observers.
    ///
    /// The invalid set and validity follow the new message.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn set_error(&self, path: impl IntoPath, message: impl Into<Value>) -> Result<()> {
        let path = path.into_path().map_err(|e| e.in_operation("set_error"))?;
        {
            let mut state = self.shared.state.borrow_mut();
            state.put_error(&path, message.into());
            state.sync_invalid(&path);
        }
        self.notify(&path, false);
        Ok(())
    }

    pub(crate) fn write_value(&self, path: &Path, value: Value) {
        trace!(path = %path, value = %value, "set_value");
        access::set(&mut self.shared.state.borrow_mut().values, path, value);
        self.validate(path);
        self.notify(path, true);
    }

    /// Runs local and global validation for `path` against its current value.
    fn validate(&self, path: &Path) {
        let value = access::get_or_empty(&self.shared.state.borrow().values, path);
        let validators = self.shared.validators.borrow().validators_for(path);
        let message = validator::run_all(&validators, &value);
        {
            let mut state = self.shared.state.borrow_mut();
            state.put_error(path, Value::from(message));
            state.sync_invalid(path);
        }

        let Some(global) = &self.shared.global_validator else {
            return;
        };
        let (values, errors) = {
            let state = self.shared.state.borrow();
            (state.values.clone(), state.errors.clone())
        };
        let tree = global.run(&values, &errors);
        if !matches!(tree, Value::Object(_) | Value::Array(_)) {
            // A scalar would address the root and wipe the whole error tree.
            return;
        }
        let mut state = self.shared.state.borrow_mut();
        for leaf in keyify(&tree) {
            let message = access::get_or(&tree, &leaf, Value::Nil);
            state.put_error(&leaf, message);
            state.sync_invalid(&leaf);
        }
    }

    /// Fires observers for `path`: the global channel first when
    /// `include_global` is set, then the path's own channel.
    pub(crate) fn notify(&self, path: &Path, include_global: bool) {
        let callbacks = {
            let hub = self.shared.observers.borrow();
            let mut callbacks = if include_global { hub.global() } else { Vec::new() };
            if !path.is_root() || !include_global {
                callbacks.extend(hub.scoped(path));
            }
            callbacks
        };
        for callback in callbacks {
            callback();
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Mounts local validators on `path`.
    ///
    /// Seeds the path's dirty flag to `false` if it has none, then re-applies
    /// the current value so the freshly mounted validators run against it.
    /// Dropping the returned guard removes exactly these validator instances.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn subscribe_item(
        &self,
        path: impl IntoPath,
        validators: impl IntoValidators,
    ) -> Result<ItemSubscription> {
        let path = path
            .into_path()
            .map_err(|e| e.in_operation("subscribe_item"))?;
        let validators = validators.into_validators();
        debug!(path = %path, count = validators.len(), "mounting validators");
        self.shared
            .validators
            .borrow_mut()
            .register(&path, validators.clone());

        let current = {
            let mut state = self.shared.state.borrow_mut();
            if access::get(&state.dirty, &path).is_none() {
                state.put_dirty(&path, Value::Bool(false));
            }
            access::get_or_empty(&state.values, &path)
        };
        self.write_value(&path, current);

        Ok(ItemSubscription::new(
            Rc::downgrade(&self.shared),
            path,
            validators,
        ))
    }

    /// Registers an observer on `path`; the root path (`""`) subscribes to
    /// the global channel, which fires on every value write.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn subscribe_observer(
        &self,
        path: impl IntoPath,
        callback: impl Fn() + 'static,
    ) -> Result<Subscription> {
        let path = path
            .into_path()
            .map_err(|e| e.in_operation("subscribe_observer"))?;
        let id = self
            .shared
            .observers
            .borrow_mut()
            .subscribe(&path, Rc::new(callback));
        trace!(path = %path, "observer subscribed");
        Ok(Subscription::new(Rc::downgrade(&self.shared), path, id))
    }

    /// Registers a global observer.
    pub fn subscribe_global(&self, callback: impl Fn() + 'static) -> Subscription {
        let path = Path::root();
        let id = self
            .shared
            .observers
            .borrow_mut()
            .subscribe(&path, Rc::new(callback));
        Subscription::new(Rc::downgrade(&self.shared), path, id)
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns the identifier for `path`, generating one on first request.
    ///
    /// Identifiers are positional: after an array removal the identifier of a
    /// later element moves down with the element's index.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for a malformed path string.
    pub fn get_unique_id(&self, path: impl IntoPath) -> Result<String> {
        let path = path
            .into_path()
            .map_err(|e| e.in_operation("get_unique_id"))?;
        let mut state = self.shared.state.borrow_mut();
        if let Some(Value::String(id)) = access::get(&state.ids, &path) {
            return Ok(id.to_string());
        }
        let id = self.shared.ids.generate();
        state.put_id(&path, Value::from(id.as_str()));
        trace!(path = %path, id = %id, "generated item id");
        Ok(id)
    }

    /// Returns the whole identifier tree.
    #[must_use]
    pub fn ids(&self) -> Value {
        self.shared.state.borrow().ids.clone()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Replaces the value tree with `value` and revalidates everything.
    ///
    /// Every leaf of the new tree goes through [`set_value`](Self::set_value);
    /// paths with mounted validators that are not leaves of the new tree are
    /// revalidated in place. Unless `options.keep_dirty` is set, every known
    /// dirty flag is cleared and its observers notified.
    pub fn initialize(&self, value: impl Into<Value>, options: InitOptions) {
        self.initialize_with(value.into(), options);
    }

    fn initialize_with(&self, value: Value, options: InitOptions) {
        let leaves = keyify(&value);
        debug!(
            leaves = leaves.len(),
            replace_snapshot = options.replace_snapshot,
            keep_dirty = options.keep_dirty,
            "initializing form store"
        );
        {
            let mut state = self.shared.state.borrow_mut();
            if options.replace_snapshot {
                state.init = value.clone();
            }
            state.values = value.clone();
            state.errors = Value::empty_object();
            state.invalid.clear();
            for leaf in &leaves {
                if access::get(&state.dirty, leaf).is_none() {
                    state.put_dirty(leaf, Value::Bool(false));
                }
            }
        }

        for leaf in &leaves {
            self.write_value(leaf, access::get_or(&value, leaf, Value::Nil));
        }

        let covered: HashSet<&Path> = leaves.iter().collect();
        let mounted: Vec<Path> = self
            .shared
            .validators
            .borrow()
            .paths()
            .filter(|path| !covered.contains(path))
            .cloned()
            .collect();
        for path in &mounted {
            self.validate(path);
            self.notify(path, true);
        }

        if !options.keep_dirty {
            let dirty_paths = {
                let mut state = self.shared.state.borrow_mut();
                let paths = keyify(&state.dirty);
                for path in &paths {
                    state.put_dirty(path, Value::Bool(false));
                }
                paths
            };
            for path in &dirty_paths {
                self.notify(path, false);
            }
        }
    }

    /// Restores the initial snapshot, revalidates, and clears dirty flags.
    pub fn reset(&self) {
        debug!("resetting form store");
        let init = self.init_snapshot();
        self.initialize_with(init, InitOptions::default().with_replace_snapshot(false));
    }

    /// Marks every known path dirty and returns the current validity, values
    /// and errors.
    ///
    /// Validation is not re-run; it is already current from earlier writes.
    pub fn submit(&self) -> Submission {
        let (paths, submission) = {
            let mut state = self.shared.state.borrow_mut();
            let paths = keyify(&state.dirty);
            for path in &paths {
                state.put_dirty(path, Value::Bool(true));
            }
            let submission = Submission {
                valid: state.invalid.is_empty(),
                values: state.values.clone(),
                errors: state.errors.clone(),
            };
            (paths, submission)
        };
        debug!(valid = submission.valid, paths = paths.len(), "submitting form");
        for path in &paths {
            self.notify(path, false);
        }
        submission
    }
}
