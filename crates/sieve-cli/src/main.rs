mod cli;
mod run;

use clap::Parser;
use cli::Cli;
use std::{io, process::ExitCode};

const ENV_LOG: &str = "SIEVE_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    match run::run_command(cli.command, &cli.config, stdin, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

// stdout carries results, so logs go to stderr
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };

    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_filter.to_string());

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .with_env_filter(filter)
        .init();
}
