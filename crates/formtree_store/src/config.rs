//! Store configuration.

use std::fmt;
use std::rc::Rc;

use formtree_foundation::Value;

/// Prefix used for generated item identifiers unless configured otherwise.
pub const DEFAULT_ID_PREFIX: &str = "formtree-item-";

/// Whole-tree validator.
///
/// Called with `(values, errors)` after every value write; returns an error
/// tree whose leaves are merged into the store's error tree.
#[derive(Clone)]
pub struct GlobalValidator(Rc<dyn Fn(&Value, &Value) -> Value>);

impl GlobalValidator {
    /// Wraps a validation function.
    pub fn new(validate: impl Fn(&Value, &Value) -> Value + 'static) -> Self {
        Self(Rc::new(validate))
    }

    /// Runs the validator.
    #[must_use]
    pub fn run(&self, values: &Value, errors: &Value) -> Value {
        (self.0)(values, errors)
    }
}

impl fmt::Debug for GlobalValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlobalValidator({:p})", Rc::as_ptr(&self.0))
    }
}

/// Configuration for a [`FormStore`](crate::FormStore).
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Initial value tree; also the snapshot restored by reset.
    pub init_value: Value,

    /// Optional whole-tree validator.
    pub validate: Option<GlobalValidator>,

    /// Prefix for generated item identifiers.
    pub id_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            init_value: Value::empty_object(),
            validate: None,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with an empty object as the initial value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the initial value tree.
    #[must_use]
    pub fn with_init_value(mut self, value: impl Into<Value>) -> Self {
        self.init_value = value.into();
        self
    }

    /// Builder method to set the whole-tree validator.
    #[must_use]
    pub fn with_validate(mut self, validate: impl Fn(&Value, &Value) -> Value + 'static) -> Self {
        self.validate = Some(GlobalValidator::new(validate));
        self
    }

    /// Builder method to set the identifier prefix.
    #[must_use]
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }
}
