//! Shared utilities.
//!
//! Test helpers live here; they are only compiled for tests.

#[cfg(test)]
pub mod testutil;
