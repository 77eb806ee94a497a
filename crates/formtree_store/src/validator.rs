//! Per-path local validators.
//!
//! A validator maps a field value to an error message, the empty string
//! meaning "valid". Validators are registered per path in insertion order and
//! removed by identity, so two mounts of the same path never disturb each
//! other's entries.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use formtree_foundation::{Path, Value};

/// A local validation function with reference identity.
///
/// Cloning shares the underlying function; clones compare equal under
/// [`Validator::same`].
#[derive(Clone)]
pub struct Validator(Rc<dyn Fn(&Value) -> String>);

impl Validator {
    /// Wraps a validation function.
    pub fn new(validate: impl Fn(&Value) -> String + 'static) -> Self {
        Self(Rc::new(validate))
    }

    /// Runs the validator against `value`.
    #[must_use]
    pub fn run(&self, value: &Value) -> String {
        (self.0)(value)
    }

    /// Returns true if both handles refer to the same function instance.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator({:p})", Rc::as_ptr(&self.0))
    }
}

/// Anything that can be registered as the validators of one path: a single
/// [`Validator`] or a list of them.
///
/// Only these shapes convert, so registering something that is not a
/// validator is rejected at compile time.
pub trait IntoValidators {
    /// Converts `self` into an ordered list of validators.
    fn into_validators(self) -> Vec<Validator>;
}

impl IntoValidators for Validator {
    fn into_validators(self) -> Vec<Validator> {
        vec![self]
    }
}

impl IntoValidators for Vec<Validator> {
    fn into_validators(self) -> Vec<Validator> {
        self
    }
}

impl IntoValidators for &[Validator] {
    fn into_validators(self) -> Vec<Validator> {
        self.to_vec()
    }
}

impl<const N: usize> IntoValidators for [Validator; N] {
    fn into_validators(self) -> Vec<Validator> {
        self.into()
    }
}

impl IntoValidators for Option<Validator> {
    fn into_validators(self) -> Vec<Validator> {
        self.into_iter().collect()
    }
}

/// Runs `validators` in order and returns the first non-empty message, or
/// the empty string if all pass.
#[must_use]
pub fn run_all(validators: &[Validator], value: &Value) -> String {
    validators
        .iter()
        .map(|validator| validator.run(value))
        .find(|message| !message.is_empty())
        .unwrap_or_default()
}

/// Registry of local validators keyed by path.
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    by_path: HashMap<Path, Vec<Validator>>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends validators to the list for `path`.
    pub fn register(&mut self, path: &Path, validators: impl IntoValidators) {
        let validators = validators.into_validators();
        if validators.is_empty() {
            return;
        }
        self.by_path
            .entry(path.clone())
            .or_default()
            .extend(validators);
    }

    /// Removes one registration of each given validator from `path`.
    ///
    /// Matching is by identity. Validators that are not registered are
    /// ignored.
    pub fn unregister(&mut self, path: &Path, validators: &[Validator]) {
        let Some(registered) = self.by_path.get_mut(path) else {
            return;
        };
        for validator in validators {
            if let Some(i) = registered.iter().position(|v| v.same(validator)) {
                registered.remove(i);
            }
        }
        if registered.is_empty() {
            self.by_path.remove(path);
        }
    }

    /// Returns a copy of the validators registered for `path`.
    #[must_use]
    pub fn validators_for(&self, path: &Path) -> Vec<Validator> {
        self.by_path.get(path).cloned().unwrap_or_default()
    }

    /// Returns the number of validators registered for `path`.
    #[must_use]
    pub fn count(&self, path: &Path) -> usize {
        self.by_path.get(path).map_or(0, Vec::len)
    }

    /// Returns every path that has at least one validator.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.by_path.keys()
    }
}
