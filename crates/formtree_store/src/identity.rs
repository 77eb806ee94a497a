//! Process-unique item identifiers.
//!
//! Identifiers have the form `{prefix}{n}` where `n` comes from one global
//! counter, so no two identifiers handed out in a process collide, even across
//! stores with the same prefix.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generated identifiers.
static ITEM_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generator for item identifiers with a fixed prefix.
#[derive(Clone, Debug)]
pub struct IdGenerator {
    prefix: String,
}

impl IdGenerator {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Generates a fresh identifier.
    #[must_use]
    pub fn generate(&self) -> String {
        let n = ITEM_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{}{n}", self.prefix)
    }
}
