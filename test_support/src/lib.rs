//! Test utilities shared by the integration suites.
//!
//! [`rules`] builds rule sets and timestamp maps without YAML, and
//! [`project`] lays out temporary directories holding rules and timestamps
//! files for binary tests.

pub mod project;
pub mod rules;

pub use project::TempProject;
pub use rules::{rule, rule_set, timestamps};
