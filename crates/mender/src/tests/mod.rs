//! Behavioural suites and shared fixtures.

mod edit_behaviour;
mod locate_behaviour;
pub(crate) mod support;
