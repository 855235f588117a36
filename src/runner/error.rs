//! Error types for the runner module.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigKind;

/// Errors raised while resolving the inputs of a command.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// An input file does not exist at the expected path.
    #[error("{kind} file '{path}' not found")]
    #[diagnostic(code(tickmake::runner::input_not_found))]
    InputNotFound {
        /// Which input was missing.
        kind: ConfigKind,
        /// The path that was attempted.
        path: Utf8PathBuf,
        /// How to point the command at the file.
        #[help]
        help: &'static str,
    },

    /// A path supplied on the command line is not valid UTF-8.
    #[error("path '{path}' is not valid UTF-8")]
    #[diagnostic(code(tickmake::runner::non_utf8_path))]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },
}
