//! Sales Import CLI.

use clap::{ColorChoice, Parser};
use sales_cli::logging::{LogConfig, init_logging};
use sales_commit::CommitState;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{
    print_validate_result, run_commit, run_detect, run_fields, run_preview, run_validate,
};
use crate::summary::print_commit_outcome;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Fields(args) => report(run_fields(&args)),
        Command::Preview(args) => report(run_preview(&args)),
        Command::Detect(args) => report(run_detect(&args)),
        Command::Validate(args) => match run_validate(&args) {
            Ok(result) => {
                print_validate_result(&result, args.max_errors);
                if result.report.is_empty() { 0 } else { 1 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Commit(args) => match run_commit(&args) {
            Ok(outcome) => {
                print_commit_outcome(&outcome, &args.output);
                match outcome.state {
                    CommitState::Completed if outcome.error_count == 0 => 0,
                    _ => 1,
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn report(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Logging configuration from the global flags.
///
/// `-v`/`-q` and `--log-level` switch off the `RUST_LOG` override.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level = cli
        .log_level
        .map_or_else(|| cli.verbosity.tracing_level_filter(), LevelFilter::from);
    let explicit = cli.verbosity.is_present() || cli.log_level.is_some();
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        use_env_filter: !explicit,
        with_ansi,
        ..LogConfig::default()
    }
    .with_level(level)
    .with_format(cli.log_format.into())
    .with_log_file(cli.log_file.clone())
    .with_log_data(cli.log_data)
}
