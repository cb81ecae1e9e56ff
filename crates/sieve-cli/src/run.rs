use crate::cli::{CheckArgs, Command, DatasetArgs, FilterInput, NormalizeArgs};
use serde::Serialize;
use sieve_config::ConfigError;
use sieve_core::{
    node::FilterNode,
    normalize::{NormalizeError, Pass, normalize_with, parse_passes},
    parse::{ParseError, parse},
    schema::{RegistryError, Schema, SchemaRegistry},
    session::{Outcome, Session},
    validate::Validator,
};
use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// CliError
///

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("failed to read filter from '{}': {source}", .path.display())]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("failed to read filter from stdin: {0}")]
    ReadStdin(io::Error),

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] sieve_core::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Validation issues, one per line.
    #[error("{}", .0.join("\n"))]
    Rejected(Vec<String>),
}

impl CliError {
    /// 1 for a rejected filter, 2 when the request could not be evaluated.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Rejected(_) => 1,
            _ => 2,
        }
    }
}

///
/// CheckReport
///

#[derive(Serialize)]
struct CheckReport<'a> {
    dataset: &'a str,
    accepted: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a FilterNode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [String]>,
}

/// Run one subcommand. Only `normalize` works without a config file.
pub fn run_command(
    command: Command,
    config: &Path,
    stdin: impl Read,
    mut out: impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Normalize(args) => normalize(&args, stdin, &mut out),
        Command::Datasets => datasets(&sieve_config::load_registry(config)?, &mut out),
        Command::Validate(args) => {
            validate(&sieve_config::load_registry(config)?, &args, stdin, &mut out)
        }
        Command::Check(args) => check(&sieve_config::load_registry(config)?, &args, stdin, &mut out),
    }
}

fn normalize(args: &NormalizeArgs, stdin: impl Read, out: &mut impl Write) -> Result<(), CliError> {
    let passes = selected_passes(args.passes.as_deref())?;
    let node = parse(&read_filter(&args.input, stdin)?)?;

    let canonical = normalize_with(&node, &passes)?;
    write_json(out, &canonical, args.pretty)
}

fn datasets(registry: &SchemaRegistry, out: &mut impl Write) -> Result<(), CliError> {
    for name in registry.names() {
        write!(out, "{name}")?;

        if let Some(schema) = registry.get(name)
            && !schema.foreigns().is_empty()
        {
            write!(out, " [foreigns: {}]", schema.foreigns().join(", "))?;
        }
        if registry.default_name() == Some(name) {
            write!(out, " (default)")?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn validate(
    registry: &SchemaRegistry,
    args: &DatasetArgs,
    stdin: impl Read,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let view = match args.dataset.as_deref() {
        Some(name) => registry.view(name)?,
        None => registry.default_view()?,
    };
    let node = parse(&read_filter(&args.input, stdin)?)?;

    let report = Validator::new(view.clone()).validate(&node);
    if !report.is_valid() {
        return Err(CliError::Rejected(report.messages()));
    }

    writeln!(out, "filter is valid for dataset '{}'", view.name())?;

    Ok(())
}

fn check(
    registry: &SchemaRegistry,
    args: &CheckArgs,
    stdin: impl Read,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let passes = selected_passes(args.passes.as_deref())?;
    let text = read_filter(&args.target.input, stdin)?;

    let outcome = Session::new(registry)
        .with_passes(passes)
        .check(args.target.dataset.as_deref(), &text)?;

    match outcome {
        Outcome::Accepted(accepted) if args.json => {
            let report = CheckReport {
                dataset: &accepted.dataset,
                accepted: true,
                filter: Some(&accepted.filter),
                errors: None,
            };
            write_json(out, &report, false)
        }
        Outcome::Accepted(accepted) => write_json(out, &accepted.filter, false),
        Outcome::Rejected(rejection) => {
            if args.json {
                let report = CheckReport {
                    dataset: &rejection.dataset,
                    accepted: false,
                    filter: None,
                    errors: Some(rejection.errors.as_slice()),
                };
                write_json(out, &report, false)?;
            }
            tracing::debug!(dataset = %rejection.dataset, "check rejected filter");

            Err(CliError::Rejected(rejection.errors))
        }
    }
}

fn selected_passes(names: Option<&[String]>) -> Result<Vec<Pass>, CliError> {
    match names {
        Some(names) => Ok(parse_passes(names)?),
        None => Ok(Pass::ALL.to_vec()),
    }
}

fn read_filter(input: &FilterInput, mut stdin: impl Read) -> Result<String, CliError> {
    if let Some(text) = &input.filter {
        return Ok(text.clone());
    }

    if let Some(path) = &input.file {
        return std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
            path: path.clone(),
            source,
        });
    }

    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .map_err(CliError::ReadStdin)?;

    Ok(text)
}

fn write_json<T: Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;

    Ok(())
}

///
/// TESTS
///
