//! Reactive form state for formtree.
//!
//! This crate provides:
//! - [`FormStore`] - Values, dirty flags, errors and identifiers kept in
//!   parallel trees, with validation and change notification
//! - [`Validator`] / [`ValidatorRegistry`] - Per-path local validators
//! - [`ObserverHub`] - Global and path-scoped observers
//! - [`FormItem`] - Per-field binding used by form controls
//! - [`StoreConfig`] - Store configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod array;
pub mod binding;
pub mod config;
pub mod dump;
pub mod identity;
pub mod observer;
pub mod store;
pub mod subscription;
pub mod validator;

pub use binding::FormItem;
pub use config::{DEFAULT_ID_PREFIX, GlobalValidator, StoreConfig};
pub use dump::StoreDump;
pub use identity::IdGenerator;
pub use observer::{Callback, ObserverHub, ObserverId};
pub use store::{FormStore, InitOptions, Submission, WeakStore};
pub use subscription::{ItemSubscription, Subscription};
pub use validator::{IntoValidators, Validator, ValidatorRegistry};
