//! Hints attached to YAML diagnostics, chosen by file kind and message.

use super::diagnostics::ConfigKind;

const TAB_HINT: &str = "Use spaces for indentation; tabs are invalid in YAML.";

const RULE_HINTS: &[(&str, &str)] = &[
    (
        "missing field",
        "Every rule needs 'target', 'depends' and 'recipes'; use [] for an empty list.",
    ),
    (
        "unknown field",
        "Rules accept only 'target', 'depends', 'recipes' and 'timestamp'.",
    ),
    (
        "invalid type",
        "'target' is a string, 'depends' and 'recipes' are lists of strings, 'timestamp' is an integer.",
    ),
    (
        "expected a sequence",
        "The rules file is a list: start each rule with '- target:'.",
    ),
];

const TIMESTAMP_HINTS: &[(&str, &str)] = &[(
    "invalid",
    "Map each target to an integer, for example 'app: 3'.",
)];

const SYNTAX_HINTS: &[(&str, &str)] = &[
    (
        "did not find expected",
        "Check that brackets and quotes are closed on the same entry.",
    ),
    (
        "mapping values are not allowed",
        "Quote values that contain ': '.",
    ),
];

/// Pick a hint for `detail`, the `serde-saphyr` message, raised on `line`.
pub(super) fn hint_for(kind: ConfigKind, detail: &str, line: Option<&str>) -> Option<&'static str> {
    if line.is_some_and(|text| {
        text.chars()
            .take_while(|c| c.is_whitespace())
            .any(|c| c == '\t')
    }) {
        return Some(TAB_HINT);
    }
    let lower = detail.to_lowercase();
    let specific = match kind {
        ConfigKind::Rules => RULE_HINTS,
        ConfigKind::Timestamps => TIMESTAMP_HINTS,
    };
    specific
        .iter()
        .chain(SYNTAX_HINTS)
        .find(|(needle, _)| lower.contains(*needle))
        .map(|(_, hint)| *hint)
}
