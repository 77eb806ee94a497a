//! formtree - Reactive form state
//!
//! This crate re-exports all layers of the formtree system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: formtree_store      - Form store, validators, observers, bindings
//! Layer 0: formtree_foundation - Core types (Value, Path, Error), path access
//! ```
//!
//! # Example
//!
//! ```
//! use formtree::foundation::Value;
//! use formtree::store::{FormStore, Validator};
//!
//! let store = FormStore::with_value(Value::object([("password", "")]));
//! let required = Validator::new(|v| {
//!     if v.is_truthy() { String::new() } else { "required".to_string() }
//! });
//! let _item = store.subscribe_item("password", required).unwrap();
//!
//! assert!(!store.is_valid());
//! store.set_value("password", "hunter2").unwrap();
//! assert!(store.is_valid());
//! ```

pub use formtree_foundation as foundation;
pub use formtree_store as store;
