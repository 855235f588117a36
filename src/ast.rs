//! Rule set structures.
//!
//! This module defines the records that describe a build: an ordered list of
//! [`Rule`]s plus the external [`TimestampMap`]. They mirror the YAML schema
//! accepted by the loader in [`crate::config`] and are deserialised with
//! `serde-saphyr`.
//!
//! ```rust
//! use tickmake::ast::RuleSet;
//!
//! let yaml = "- target: app\n  depends: [main.o]\n  recipes: [\"link @DEPENDENCIES\"]\n";
//! let rules: RuleSet = serde_saphyr::from_str(yaml).expect("parse");
//! assert_eq!(rules.len(), 1);
//! assert_eq!(rules.iter().next().map(|r| r.target.as_str()), Some("app"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marker standing in for the stem inside pattern rules.
pub const WILDCARD: char = '%';

/// Logical timestamp used by the build clock.
pub type Timestamp = i64;

/// Externally supplied timestamps keyed by target identifier.
///
/// Insertion order is preserved so that warnings about unknown entries are
/// reported in file order.
pub type TimestampMap = IndexMap<String, Timestamp>;

/// A single build rule.
///
/// A rule names the target it produces, the prerequisites it consumes and the
/// recipe lines that bring it up to date. The `depends` and `recipes` keys are
/// mandatory, though either may be an empty sequence.
///
/// ```yaml
/// - target: main.o
///   depends: [main.c]
///   recipes: ["cc -c @DEP[0] -o @TARGET"]
///   timestamp: 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Identifier of the node this rule builds.
    pub target: String,
    /// Prerequisites in declaration order.
    pub depends: Vec<String>,
    /// Recipe lines, emitted verbatim (after variable expansion) on rebuild.
    pub recipes: Vec<String>,
    /// Optional seed timestamp for the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl Rule {
    /// Construct a rule without a seed timestamp.
    ///
    /// ```rust
    /// use tickmake::ast::Rule;
    /// let rule = Rule::new("app", ["a.o"], ["link @DEPENDENCIES"]);
    /// assert_eq!(rule.depends, vec!["a.o".to_owned()]);
    /// ```
    #[must_use]
    pub fn new<D, R>(target: impl Into<String>, depends: D, recipes: R) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            target: target.into(),
            depends: depends.into_iter().map(Into::into).collect(),
            recipes: recipes.into_iter().map(Into::into).collect(),
            timestamp: None,
        }
    }

    /// Attach a seed timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Whether the target contains the [`WILDCARD`] marker.
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        self.target.contains(WILDCARD)
    }
}

/// Ordered sequence of rules as supplied by the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<Rule>);

impl RuleSet {
    /// Wrap an ordered list of rules.
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self(rules)
    }

    /// Number of rules, pattern rules included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no rules at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the rules in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    /// Consume the set, returning the rules.
    #[must_use]
    pub fn into_inner(self) -> Vec<Rule> {
        self.0
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self(rules)
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for RuleSet {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
