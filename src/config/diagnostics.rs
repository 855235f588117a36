//! Errors raised while loading rules and timestamps files.
//!
//! YAML failures are wrapped in a [`YamlDiagnostic`] that names the kind of
//! file, the line and column `serde-saphyr` reported, and for rules files the
//! position of the rule the error falls in.

use std::fmt;

use camino::Utf8PathBuf;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_saphyr::Error as YamlError;
use thiserror::Error;

use super::hints;

/// Which input file a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    /// The rules file.
    Rules,
    /// The timestamps file.
    Timestamps,
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rules => "rules",
            Self::Timestamps => "timestamps",
        })
    }
}

/// Error raised when a rules or timestamps file cannot be loaded.
///
/// Every variant stops the run before a graph is built.
///
/// # Examples
/// ```rust
/// use tickmake::config::ConfigError;
///
/// let err = ConfigError::EmptyTarget { index: 2 };
/// assert_eq!(format!("{err}"), "rule #2 has an empty 'target'");
/// ```
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    #[diagnostic(code(tickmake::config::read))]
    Read {
        /// Path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The YAML is malformed or a field has the wrong shape.
    #[error("malformed {kind} file")]
    #[diagnostic(code(tickmake::config::parse))]
    Parse {
        /// Which file failed.
        kind: ConfigKind,
        /// Diagnostic pointing at the offending YAML.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },

    /// A rule has an empty `target`.
    #[error("rule #{index} has an empty 'target'")]
    #[diagnostic(
        code(tickmake::config::empty_target),
        help("every rule needs a non-empty target")
    )]
    EmptyTarget {
        /// Zero-based position of the rule in the file.
        index: usize,
    },
}

/// A `serde-saphyr` failure located in its source file.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(tickmake::config::yaml))]
pub struct YamlDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("rejected here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    #[source]
    source: YamlError,
    message: String,
}

/// One-based line and column of a YAML error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: usize,
    column: usize,
}

impl Position {
    fn of(err: &YamlError) -> Option<Self> {
        let loc = err.location()?;
        let line = usize::try_from(loc.line()).ok().filter(|n| *n > 0)?;
        let column = usize::try_from(loc.column()).ok().filter(|n| *n > 0)?;
        Some(Self { line, column })
    }

    fn line_text(self, src: &str) -> &str {
        src.lines().nth(self.line - 1).unwrap_or_default()
    }

    /// Span covering the character at this position, or an empty span at
    /// the end of the line when the column runs past it.
    fn span(self, src: &str) -> SourceSpan {
        let line_start: usize = src
            .split_inclusive('\n')
            .take(self.line - 1)
            .map(str::len)
            .sum();
        let text = self.line_text(src);
        let (offset, width) = text
            .char_indices()
            .nth(self.column - 1)
            .map_or((text.len(), 0), |(idx, ch)| (idx, ch.len_utf8()));
        SourceSpan::new((line_start + offset).into(), width)
    }
}

/// Index of the top-level rule that contains `line`, counting the `-`
/// entries of the sequence up to and including it.
fn rule_index(src: &str, line: usize) -> Option<usize> {
    src.lines()
        .take(line)
        .filter(|text| text.starts_with('-'))
        .count()
        .checked_sub(1)
}

/// Build [`ConfigError::Parse`] for a YAML failure in `src`.
pub(super) fn parse_error(err: YamlError, kind: ConfigKind, name: &str, src: &str) -> ConfigError {
    let position = Position::of(&err);
    let detail = err.to_string();

    let mut message = format!("invalid {kind} file {name}");
    if let Some(pos) = position {
        message.push_str(&format!(" at line {}, column {}", pos.line, pos.column));
        if kind == ConfigKind::Rules
            && let Some(index) = rule_index(src, pos.line)
        {
            message.push_str(&format!(" (rule #{index})"));
        }
    }
    message.push_str(": ");
    message.push_str(&detail);

    let help = hints::hint_for(kind, &detail, position.map(|pos| pos.line_text(src)));
    if let Some(hint) = help {
        message.push_str("\nhelp: ");
        message.push_str(hint);
    }

    ConfigError::Parse {
        kind,
        source: Box::new(YamlDiagnostic {
            src: NamedSource::new(name, src.to_owned()),
            span: position.map(|pos| pos.span(src)),
            help: help.map(str::to_owned),
            source: err,
            message,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rules_error(yaml: &str) -> ConfigError {
        let err = serde_saphyr::from_str::<crate::ast::RuleSet>(yaml).expect_err("invalid rules");
        parse_error(err, ConfigKind::Rules, "rules.yml", yaml)
    }

    #[rstest]
    fn names_the_rule_containing_the_error() {
        let yaml = concat!(
            "- target: a\n",
            "  depends: []\n",
            "  recipes: []\n",
            "- target: b\n",
            "  depends: []\n",
            "  recipes: []\n",
            "  command: cc\n",
        );
        let msg = match rules_error(yaml) {
            ConfigError::Parse { kind, source } => {
                assert_eq!(kind, ConfigKind::Rules);
                source.to_string()
            }
            other => panic!("unexpected error: {other:?}"),
        };
        assert!(msg.starts_with("invalid rules file rules.yml at line"), "{msg}");
        assert!(msg.contains("(rule #1)"), "{msg}");
    }

    #[rstest]
    #[case("- target: a\n", 1, Some(0))]
    #[case("- target: a\n  depends: []\n- target: b\n", 3, Some(1))]
    #[case("rules:\n  - target: a\n", 2, None)]
    fn counts_rules_up_to_line(#[case] src: &str, #[case] line: usize, #[case] expected: Option<usize>) {
        assert_eq!(rule_index(src, line), expected);
    }

    #[rstest]
    #[case(1, 3, 2, 1)]
    #[case(1, 4, 3, 2)]
    #[case(2, 1, 10, 1)]
    #[case(2, 9, 16, 0)]
    fn spans_point_at_the_column(
        #[case] line: usize,
        #[case] column: usize,
        #[case] offset: usize,
        #[case] len: usize,
    ) {
        let span = Position { line, column }.span("- tärget\n  x: 1\n");
        assert_eq!((span.offset(), span.len()), (offset, len));
    }
}
