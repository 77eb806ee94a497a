//! Values, paths, and path access for formtree.
//!
//! This crate provides:
//! - [`Value`] - The nested value type stored in every form tree
//! - [`Path`] - Parsed `a.b[2].c` locations within a tree
//! - [`access`] - Get, set and delete by path
//! - [`keyify`] - Leaf path enumeration
//! - [`Error`] - Error types with context
//! - Persistent collections ([`Array`], [`Object`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod access;
pub mod collections;
pub mod error;
pub mod keyify;
pub mod path;
pub mod value;

pub use collections::{Array, Object};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use keyify::keyify;
pub use path::{IntoPath, Path, Segment};
pub use value::{Value, ValueKind};
