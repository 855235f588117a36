//! Pattern rule extraction.

use indexmap::IndexMap;
use serde::Serialize;

use crate::ast::{Rule, WILDCARD};
use crate::error::BuildError;

/// Template half of a pattern rule; the target lives in the index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternRule {
    /// Dependency templates, possibly containing the wildcard.
    pub depends: Vec<String>,
    /// Recipe templates, possibly containing the wildcard.
    pub recipes: Vec<String>,
}

impl PatternRule {
    /// Substitute `stem` for every wildcard in the template.
    #[must_use]
    pub fn instantiate(&self, stem: &str) -> Self {
        let bind = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|item| item.replace(WILDCARD, stem))
                .collect()
        };
        Self {
            depends: bind(&self.depends),
            recipes: bind(&self.recipes),
        }
    }
}

/// Pattern rules keyed by their literal target, for example `%.o`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PatternRuleIndex {
    rules: IndexMap<String, PatternRule>,
}

impl PatternRuleIndex {
    /// Separate pattern rules from concrete ones.
    ///
    /// Returns the index together with the remaining concrete rules in their
    /// original order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::PatternMisuse`] when a pattern target holds more
    /// than one wildcard.
    pub fn split(rules: Vec<Rule>) -> Result<(Self, Vec<Rule>), BuildError> {
        let mut index = Self::default();
        let mut concrete = Vec::with_capacity(rules.len());
        for rule in rules {
            if rule.is_pattern() {
                index.insert(rule)?;
            } else {
                concrete.push(rule);
            }
        }
        tracing::debug!(
            patterns = index.len(),
            concrete = concrete.len(),
            "extracted pattern rules"
        );
        Ok((index, concrete))
    }

    fn insert(&mut self, rule: Rule) -> Result<(), BuildError> {
        if rule.target.matches(WILDCARD).count() != 1 {
            return Err(BuildError::PatternMisuse {
                target: rule.target,
                reason: "a pattern target must contain exactly one '%'".into(),
            });
        }
        let template = PatternRule {
            depends: rule.depends,
            recipes: rule.recipes,
        };
        if self.rules.insert(rule.target.clone(), template).is_some() {
            tracing::debug!(pattern = %rule.target, "pattern rule replaced by later definition");
        }
        Ok(())
    }

    /// Look up a pattern by its literal key.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&PatternRule> {
        self.rules.get(pattern)
    }

    /// Number of pattern rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no pattern rules were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over `(pattern, template)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternRule)> {
        self.rules.iter().map(|(key, rule)| (key.as_str(), rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn split_keeps_concrete_order() {
        let rules = vec![
            Rule::new("app", ["a.o"], ["link"]),
            Rule::new("%.o", ["%.c"], ["cc -c %.c"]),
            Rule::new("lib", ["b.o"], ["ar"]),
        ];
        let (index, concrete) = PatternRuleIndex::split(rules).expect("split");

        assert_eq!(index.len(), 1);
        let template = index.get("%.o").expect("pattern");
        assert_eq!(template.depends, ["%.c"]);
        let targets: Vec<&str> = concrete.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, ["app", "lib"]);
    }

    #[rstest]
    fn later_pattern_replaces_earlier() {
        let rules = vec![
            Rule::new("%.o", ["%.c"], ["first"]),
            Rule::new("%.o", ["%.cc"], ["second"]),
        ];
        let (index, _) = PatternRuleIndex::split(rules).expect("split");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("%.o").map(|p| p.recipes.clone()), Some(vec!["second".into()]));
    }

    #[rstest]
    fn multiple_wildcards_are_rejected() {
        let rules = vec![Rule::new("%/%.o", ["%.c"], ["cc"])];
        let err = PatternRuleIndex::split(rules).expect_err("misuse");
        assert!(matches!(err, BuildError::PatternMisuse { target, .. } if target == "%/%.o"));
    }

    #[rstest]
    fn instantiate_binds_every_wildcard() {
        let template = PatternRule {
            depends: vec!["%.c".into(), "%.h".into()],
            recipes: vec!["cc -c %.c -o %.o".into()],
        };
        let bound = template.instantiate("main");
        assert_eq!(bound.depends, ["main.c", "main.h"]);
        assert_eq!(bound.recipes, ["cc -c main.c -o main.o"]);
    }
}
