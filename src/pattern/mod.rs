//! Pattern ("implicit") rules.
//!
//! A pattern rule such as `%.o: %.c` is never added to the graph. It is kept
//! in a [`PatternRuleIndex`] and consulted for graph leaves that lack a rule
//! of their own. The stem bound from the leaf's identifier replaces every `%`
//! in the template's dependencies and recipes.

mod expand;
mod index;

pub use expand::{ExpansionReport, expand_patterns, pattern_key};
pub use index::{PatternRule, PatternRuleIndex};
