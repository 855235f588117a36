//! Unit tests for CLI argument parsing.
//!
//! This module exercises the command-line interface defined in
//! [`tickmake::cli`] using `rstest` for parameterised coverage of success and
//! error scenarios.
use clap::Parser;
use clap::error::ErrorKind;
use rstest::rstest;
use std::path::PathBuf;
use tickmake::cli::{BuildArgs, Cli, Commands};

fn build_with(timestamps: &str) -> Commands {
    Commands::Build(BuildArgs {
        timestamps: PathBuf::from(timestamps),
    })
}

#[rstest]
#[case(vec!["tickmake"], PathBuf::from("rules.yml"), None, false, build_with("timestamps.yml"))]
#[case(
    vec!["tickmake", "--file", "alt.yml", "-C", "work", "build", "--timestamps", "ts.yml"],
    PathBuf::from("alt.yml"),
    Some(PathBuf::from("work")),
    false,
    build_with("ts.yml"),
)]
#[case(vec!["tickmake", "-v"], PathBuf::from("rules.yml"), None, true, build_with("timestamps.yml"))]
#[case(
    vec!["tickmake", "graph"],
    PathBuf::from("rules.yml"),
    None,
    false,
    Commands::Graph { timestamps: None },
)]
#[case(
    vec!["tickmake", "graph", "--timestamps", "ts.yml"],
    PathBuf::from("rules.yml"),
    None,
    false,
    Commands::Graph { timestamps: Some(PathBuf::from("ts.yml")) },
)]
#[case(vec!["tickmake", "-f", "r.yml", "show"], PathBuf::from("r.yml"), None, false, Commands::Show)]
#[case(vec!["tickmake", "check"], PathBuf::from("rules.yml"), None, false, Commands::Check)]
fn parse_cli(
    #[case] argv: Vec<&str>,
    #[case] file: PathBuf,
    #[case] directory: Option<PathBuf>,
    #[case] verbose: bool,
    #[case] expected_cmd: Commands,
) {
    let cli = Cli::try_parse_from_with_default(argv).expect("parse");
    assert_eq!(cli.file, file);
    assert_eq!(cli.directory, directory);
    assert_eq!(cli.verbose, verbose);
    assert_eq!(cli.command.expect("command should be set"), expected_cmd);
}

#[rstest]
#[case(vec!["tickmake", "unknowncmd"], ErrorKind::InvalidSubcommand)]
#[case(vec!["tickmake", "--file"], ErrorKind::InvalidValue)]
#[case(vec!["tickmake", "--file", "alt.yml", "-C"], ErrorKind::InvalidValue)]
#[case(vec!["tickmake", "show", "extra"], ErrorKind::UnknownArgument)]
fn parse_cli_errors(#[case] argv: Vec<&str>, #[case] expected_error: ErrorKind) {
    let err = Cli::try_parse_from(argv).expect_err("unexpected success");
    assert_eq!(err.kind(), expected_error);
}
