//! Rule and timestamp constructors.

use tickmake::ast::{Rule, RuleSet, Timestamp, TimestampMap};

/// Build a rule from string slices.
///
/// # Examples
/// ```
/// use test_support::rule;
/// let r = rule("app", &["main.o"], &["link @DEPENDENCIES"]);
/// assert_eq!(r.depends, ["main.o"]);
/// ```
#[must_use]
pub fn rule(target: &str, depends: &[&str], recipes: &[&str]) -> Rule {
    Rule::new(target, depends.iter().copied(), recipes.iter().copied())
}

/// Collect rules into a [`RuleSet`] in the given order.
#[must_use]
pub fn rule_set(rules: impl IntoIterator<Item = Rule>) -> RuleSet {
    rules.into_iter().collect()
}

/// Build a timestamp map preserving entry order.
#[must_use]
pub fn timestamps(entries: &[(&str, Timestamp)]) -> TimestampMap {
    entries
        .iter()
        .map(|(id, ts)| ((*id).to_owned(), *ts))
        .collect()
}
