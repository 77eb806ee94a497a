//! Integration tests for Layer 1: Store
//!
//! Tests for the form store: reads and writes, validation, observers,
//! lifecycle, identifiers and array operations.

mod arrays;
mod properties;
mod validation;
