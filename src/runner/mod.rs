//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the inputs named on the command line, drives the pipeline and writes
//! the requested rendering to stdout.

mod error;
mod path_helpers;

pub use error::RunnerError;

use crate::ast::TimestampMap;
use crate::cli::{BuildArgs, Cli, Commands};
use crate::config::{self, ConfigKind};
use crate::pipeline::BuildContext;
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

use path_helpers::{ensure_exists, resolve_input_path};

/// Execute the parsed [`Cli`] command, writing its output to stdout.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded or any pipeline stage fails.
pub fn run(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Execute the parsed [`Cli`] command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded, a pipeline stage fails or
/// `out` cannot be written.
pub fn run_with_output(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Build(BuildArgs::default()));
    match command {
        Commands::Build(args) => {
            let mut ctx = load_context(cli)?;
            let timestamps = load_timestamps(cli, &args.timestamps)?;
            ctx.apply_timestamps(&timestamps)
                .context("assigning timestamps")?;
            let trace = ctx.schedule().context("scheduling build")?;
            info!(rebuilt = trace.rebuilt().count(), "build pass complete");
            write!(out, "{trace}").context("writing build trace")?;
        }
        Commands::Graph { timestamps } => {
            let mut ctx = load_context(cli)?;
            if let Some(path) = timestamps {
                let map = load_timestamps(cli, &path)?;
                ctx.apply_timestamps(&map).context("assigning timestamps")?;
            }
            let dump = ctx.debug_dump().context("serialising graph")?;
            out.write_all(dump.as_bytes())
                .context("writing graph dump")?;
        }
        Commands::Show => {
            let ctx = load_context(cli)?;
            let json = ctx.show_json().context("serialising graph")?;
            writeln!(out, "{json}").context("writing graph")?;
        }
        Commands::Check => {
            let ctx = load_context(cli)?;
            info!(nodes = ctx.graph().len(), "rules are valid");
        }
    }
    Ok(())
}

/// Load the rules file named by `cli` and run the graph stages over it.
fn load_context(cli: &Cli) -> Result<BuildContext> {
    let path = resolve_input_path(cli, &cli.file)?;
    ensure_exists(ConfigKind::Rules, &path)?;
    let rules =
        config::load_rules(&path).with_context(|| format!("loading rules from {path}"))?;
    debug!(path = %path, rules = rules.len(), "rules loaded");
    BuildContext::from_rules(rules).with_context(|| format!("building graph from {path}"))
}

fn load_timestamps(cli: &Cli, file: &Path) -> Result<TimestampMap> {
    let path = resolve_input_path(cli, file)?;
    ensure_exists(ConfigKind::Timestamps, &path)?;
    config::load_timestamps(&path).with_context(|| format!("loading timestamps from {path}"))
}
