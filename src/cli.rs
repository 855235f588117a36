//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. `build` is
//! the default when no subcommand is given.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_RULES_FILE, DEFAULT_TIMESTAMPS_FILE};

/// Simulate an incremental, Make-style build over logical timestamps.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the rules file.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_RULES_FILE)]
    pub file: PathBuf,

    /// Resolve relative input paths against this directory.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `build` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `build` as the default command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Parse the provided arguments, applying the default command when needed.
    ///
    /// # Errors
    ///
    /// Returns the clap error when the arguments are invalid.
    pub fn try_parse_from_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::with_default_command)
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Build(BuildArgs::default()));
        }
        self
    }
}

/// Arguments accepted by the `build` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct BuildArgs {
    /// Timestamps file mapping each target to its logical time.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_TIMESTAMPS_FILE)]
    pub timestamps: PathBuf,
}

impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            timestamps: PathBuf::from(DEFAULT_TIMESTAMPS_FILE),
        }
    }
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Run every stage and print the build trace `default`.
    Build(BuildArgs),

    /// Print each node's recipes and timestamp before scheduling.
    Graph {
        /// Stamp the graph from this file before printing.
        #[arg(long, value_name = "FILE")]
        timestamps: Option<PathBuf>,
    },

    /// Print the expanded graph and the pattern rule table as JSON.
    Show,

    /// Validate the rules without scheduling a build.
    Check,
}
