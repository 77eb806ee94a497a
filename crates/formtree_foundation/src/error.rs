//! Error types for formtree.
//!
//! Every error here is a programmer error: misuse of the API surfaced
//! synchronously to the caller. Failed validation is not an error; it is data
//! in the error tree.

use std::fmt;

use thiserror::Error;

use crate::path::Path;
use crate::value::ValueKind;

/// Result type for formtree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for formtree operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the operation that failed, keeping any existing context.
    #[must_use]
    pub fn in_operation(mut self, operation: &'static str) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_operation(operation));
        self
    }

    /// Creates a path syntax error.
    #[must_use]
    pub fn path_syntax(path: &str, position: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathSyntax {
            path: path.to_string(),
            position,
            message: message.into(),
        })
    }

    /// Creates an error for an array operation on a non-array value.
    #[must_use]
    pub fn not_an_array(path: Path, actual: ValueKind) -> Self {
        Self::new(ErrorKind::NotAnArray { path, actual })
    }

    /// Creates an index out of bounds error.
    #[must_use]
    pub fn index_out_of_bounds(path: Path, index: usize, length: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfBounds {
            path,
            index,
            length,
        })
    }

    /// Creates an error for a binding whose store is gone.
    #[must_use]
    pub fn missing_provider(path: Path) -> Self {
        Self::new(ErrorKind::MissingProvider { path })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A path string could not be parsed.
    #[error("invalid path `{path}` at byte {position}: {message}")]
    PathSyntax {
        /// The path as written.
        path: String,
        /// Byte offset of the offending character.
        position: usize,
        /// What was wrong.
        message: String,
    },

    /// An array operation targeted a value that is not an array.
    #[error("value at `{path}` is not an array (found {actual})")]
    NotAnArray {
        /// The path that was targeted.
        path: Path,
        /// The kind of value found there.
        actual: ValueKind,
    },

    /// Index out of bounds.
    #[error("index out of bounds at `{path}`: {index} (length {length})")]
    IndexOutOfBounds {
        /// The array path.
        path: Path,
        /// The index that was accessed.
        index: usize,
        /// The actual length of the array.
        length: usize,
    },

    /// A binding was used after its store was dropped.
    #[error("no form store is active for `{path}`")]
    MissingProvider {
        /// The path the binding is attached to.
        path: Path,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Store operation that was running.
    pub operation: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "in {operation}")?;
        }
        Ok(())
    }
}
