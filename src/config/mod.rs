//! Rule and timestamp file loading.
//!
//! The rules file is a YAML sequence of rule mappings and the timestamps file
//! a YAML mapping from target identifier to integer. Both are parsed with
//! `serde-saphyr`; missing keys, unknown keys and wrongly shaped values are
//! reported as [`ConfigError::Parse`] diagnostics pointing at the offending
//! line. Semantic checks that serde cannot express, such as an empty
//! `target`, run straight after deserialisation.

use std::fs;

use camino::Utf8Path;

use crate::ast::{RuleSet, TimestampMap};

mod diagnostics;
mod hints;

pub use diagnostics::{ConfigError, ConfigKind, YamlDiagnostic};

/// Default rules file name.
pub const DEFAULT_RULES_FILE: &str = "rules.yml";
/// Default timestamps file name.
pub const DEFAULT_TIMESTAMPS_FILE: &str = "timestamps.yml";

fn parse_yaml<T>(yaml: &str, name: &str, kind: ConfigKind) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned,
{
    serde_saphyr::from_str(yaml).map_err(|err| diagnostics::parse_error(err, kind, name, yaml))
}

fn read(path: &Utf8Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })
}

/// Validate rules that deserialised successfully.
///
/// # Errors
///
/// Returns [`ConfigError::EmptyTarget`] for the first rule whose target is
/// empty or only whitespace.
pub fn validate_rules(rules: &RuleSet) -> Result<(), ConfigError> {
    match rules.iter().position(|rule| rule.target.trim().is_empty()) {
        Some(index) => Err(ConfigError::EmptyTarget { index }),
        None => Ok(()),
    }
}

/// Parse a rule set from YAML text.
///
/// `name` is used in diagnostics only.
///
/// # Errors
///
/// Returns [`ConfigError`] when the YAML is malformed, a rule has the wrong
/// shape, or a target is empty.
pub fn rules_from_str(yaml: &str, name: &str) -> Result<RuleSet, ConfigError> {
    let rules: RuleSet = parse_yaml(yaml, name, ConfigKind::Rules)?;
    validate_rules(&rules)?;
    tracing::debug!(rules = rules.len(), source = name, "loaded rule set");
    Ok(rules)
}

/// Load a rule set from a file.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or fails validation.
pub fn load_rules(path: &Utf8Path) -> Result<RuleSet, ConfigError> {
    let data = read(path)?;
    rules_from_str(&data, path.as_str())
}

/// Parse a timestamp map from YAML text.
///
/// An empty document yields an empty map.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the YAML is not a mapping of strings to
/// integers.
pub fn timestamps_from_str(yaml: &str, name: &str) -> Result<TimestampMap, ConfigError> {
    if yaml.trim().is_empty() {
        return Ok(TimestampMap::new());
    }
    let map: TimestampMap = parse_yaml(yaml, name, ConfigKind::Timestamps)?;
    tracing::debug!(entries = map.len(), source = name, "loaded timestamps");
    Ok(map)
}

/// Load a timestamp map from a file.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_timestamps(path: &Utf8Path) -> Result<TimestampMap, ConfigError> {
    let data = read(path)?;
    timestamps_from_str(&data, path.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Rule;
    use rstest::rstest;

    #[rstest]
    fn parses_rules_in_order() {
        let yaml = concat!(
            "- target: app\n",
            "  depends: [a.o, b.o]\n",
            "  recipes: [\"link @DEPENDENCIES\"]\n",
            "- target: \"%.o\"\n",
            "  depends: [\"%.c\"]\n",
            "  recipes: []\n",
            "  timestamp: 4\n",
        );
        let rules = rules_from_str(yaml, "rules.yml").expect("rules");
        let parsed: Vec<Rule> = rules.into_inner();
        assert_eq!(
            parsed,
            [
                Rule::new("app", ["a.o", "b.o"], ["link @DEPENDENCIES"]),
                Rule::new("%.o", ["%.c"], Vec::<String>::new()).with_timestamp(4),
            ]
        );
    }

    #[rstest]
    #[case::missing_depends("- target: app\n  recipes: []\n")]
    #[case::missing_recipes("- target: app\n  depends: []\n")]
    #[case::unknown_key("- target: app\n  depends: []\n  recipes: []\n  actions: []\n")]
    #[case::depends_not_a_list("- target: app\n  depends: a.o\n  recipes: []\n")]
    #[case::target_not_a_string("- target: [app]\n  depends: []\n  recipes: []\n")]
    #[case::not_a_sequence("target: app\n")]
    fn malformed_rules_are_rejected(#[case] yaml: &str) {
        let err = rules_from_str(yaml, "rules.yml").expect_err("invalid");
        assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");
    }

    #[rstest]
    fn empty_target_is_rejected() {
        let yaml = "- target: ok\n  depends: []\n  recipes: []\n- target: \"\"\n  depends: []\n  recipes: []\n";
        let err = rules_from_str(yaml, "rules.yml").expect_err("invalid");
        assert!(matches!(err, ConfigError::EmptyTarget { index: 1 }));
    }

    #[rstest]
    fn parses_timestamps() {
        let map = timestamps_from_str("app: 0\na.o: 0\nb.o: 1\n", "ts.yml").expect("map");
        let entries: Vec<(&str, i64)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(entries, [("app", 0), ("a.o", 0), ("b.o", 1)]);
    }

    #[rstest]
    fn non_integer_timestamp_is_rejected() {
        let err = timestamps_from_str("app: soon\n", "ts.yml").expect_err("invalid");
        assert!(matches!(
            err,
            ConfigError::Parse {
                kind: ConfigKind::Timestamps,
                ..
            }
        ));
        assert_eq!(err.to_string(), "malformed timestamps file");
    }

    #[rstest]
    fn empty_timestamps_file_is_an_empty_map() {
        let map = timestamps_from_str("\n", "ts.yml").expect("map");
        assert!(map.is_empty());
    }

    #[rstest]
    fn missing_file_reports_path() {
        let err = load_rules(Utf8Path::new("does/not/exist.yml")).expect_err("missing");
        assert_eq!(err.to_string(), "failed to read does/not/exist.yml");
    }
}
