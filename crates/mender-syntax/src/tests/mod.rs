//! Crate-level tests for mender-syntax.

mod behaviour;
