//! Path resolution helpers for the runner module.

use crate::cli::Cli;
use crate::config::ConfigKind;
use camino::{Utf8Path, Utf8PathBuf};
use std::path::Path;

use super::RunnerError;

fn to_utf8(path: &Path) -> Result<Utf8PathBuf, RunnerError> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|invalid| RunnerError::NonUtf8Path {
        path: invalid.display().to_string(),
    })
}

/// Resolve an input path against the CLI's `-C/--directory` option.
///
/// Relative paths are joined onto the directory; absolute paths are kept.
pub(super) fn resolve_input_path(cli: &Cli, path: &Path) -> Result<Utf8PathBuf, RunnerError> {
    let file = to_utf8(path)?;
    match &cli.directory {
        Some(dir) if file.is_relative() => Ok(to_utf8(dir)?.join(file)),
        _ => Ok(file),
    }
}

/// Fail with [`RunnerError::InputNotFound`] unless `path` exists.
pub(super) fn ensure_exists(kind: ConfigKind, path: &Utf8Path) -> Result<(), RunnerError> {
    if path.exists() {
        Ok(())
    } else {
        Err(RunnerError::InputNotFound {
            kind,
            path: path.to_owned(),
            help: missing_input_help(kind),
        })
    }
}

const fn missing_input_help(kind: ConfigKind) -> &'static str {
    match kind {
        ConfigKind::Rules => {
            "create the file, pass the rules file with -f/--file, or use -C to change directory"
        }
        ConfigKind::Timestamps => {
            "create the file, pass the timestamps file with --timestamps, or use -C to change directory"
        }
    }
}
