use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sieve",
    about = "Normalize and validate structured filters",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Dataset definitions
    #[arg(long, global = true, env = "SIEVE_CONFIG", default_value = "sieve.toml")]
    pub config: PathBuf,

    /// Log at debug level unless SIEVE_LOG or RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the configured datasets
    Datasets,

    /// Print the canonical form of a filter
    Normalize(NormalizeArgs),

    /// Validate a filter as written, without normalizing it
    Validate(DatasetArgs),

    /// Normalize a filter, then validate it
    Check(CheckArgs),
}

///
/// FilterInput
///
/// Where the filter text comes from: the positional argument, `--file`,
/// or standard input when neither is given.
///

#[derive(Args, Debug, Default)]
pub struct FilterInput {
    /// Filter as JSON text
    pub filter: Option<String>,

    /// Read the filter from a file
    #[arg(long, conflicts_with = "filter")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub input: FilterInput,

    /// Comma-separated passes to run; all of them when omitted
    #[arg(long, value_delimiter = ',')]
    pub passes: Option<Vec<String>>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct DatasetArgs {
    #[command(flatten)]
    pub input: FilterInput,

    /// Dataset to validate against; the configured default when omitted
    #[arg(short, long)]
    pub dataset: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: DatasetArgs,

    /// Comma-separated passes to run; all of them when omitted
    #[arg(long, value_delimiter = ',')]
    pub passes: Option<Vec<String>>,

    /// Print the outcome as a JSON object
    #[arg(long)]
    pub json: bool,
}
