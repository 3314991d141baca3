//! tripleflat - Turtle document flattener
//!
//! Command-line interface

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tripleflat::config::{self, FlattenConfig, LogLevel};
use tripleflat::{renderer_for, FlattenError, PrefixMatch, Strictness, TurtleFlattener};

#[derive(Parser)]
#[command(name = "tripleflat")]
#[command(author = "tripleflat authors")]
#[command(version = "0.1.0")]
#[command(about = "Flatten Turtle documents into plain subject/predicate/object triples", long_about = None)]
struct Cli {
    /// Input file to process
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Read input from stdin
    #[arg(long)]
    stdin: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Column delimiter for tabular output (`\t` for tab)
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Omit the header line of tabular output
    #[arg(long)]
    no_header: bool,

    /// Treat malformed statements as errors
    #[arg(long)]
    strict: bool,

    /// How prefixes are matched in abbreviated names
    #[arg(long, value_enum)]
    prefix_match: Option<PrefixMode>,

    /// Namespace for generated identifiers when the document declares no base
    #[arg(long, value_name = "IRI")]
    fallback_ns: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to the standard search paths)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Report errors as JSON on stderr
    #[arg(long)]
    json_errors: bool,

    /// Print a default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Delimited Subject/Predicate/Object table
    Tsv,
    /// One bracketed Turtle statement per triple
    Turtle,
    /// JSON array of triples
    Json,
}

impl From<OutputFormat> for config::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Tsv => config::OutputFormat::Tsv,
            OutputFormat::Turtle => config::OutputFormat::Turtle,
            OutputFormat::Json => config::OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PrefixMode {
    /// First declared prefix found anywhere in the name
    First,
    /// Longest declared prefix the name starts with
    Longest,
}

impl From<PrefixMode> for PrefixMatch {
    fn from(mode: PrefixMode) -> Self {
        match mode {
            PrefixMode::First => PrefixMatch::First,
            PrefixMode::Longest => PrefixMatch::Longest,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    if let Err(err) = run(cli) {
        match err.downcast_ref::<FlattenError>() {
            Some(flatten_err) if json_errors => {
                eprintln!("{}", flatten_err.to_json());
                process::exit(flatten_err.exit_status());
            }
            Some(flatten_err) => {
                eprintln!("Error: {:#}", err);
                process::exit(flatten_err.exit_status());
            }
            None => {
                eprintln!("Error: {:#}", err);
                process::exit(1);
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.print_config {
        io::stdout()
            .write_all(FlattenConfig::default_config_content().as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    let config = load_config(&cli)?;
    init_tracing(&cli, config.general.log_level);
    debug!(?config, "configuration loaded");

    let content = read_input(&cli)?;

    let flattener = TurtleFlattener::with_options(config.parse.options());
    let doc = flattener.parse(&content).map_err(|e| {
        let err = FlattenError::from(e);
        match &cli.input {
            Some(path) => err.at(path.display().to_string()),
            None => err.at("<stdin>"),
        }
    })?;

    info!(
        triples = doc.triples().len(),
        prefixes = doc.prefixes().len(),
        warnings = doc.warnings().len(),
        "flattened document"
    );

    let output_content = renderer_for(config.general.format, &config.output).render(&doc);

    if let Some(output_path) = &cli.output {
        fs::write(output_path, output_content)
            .with_context(|| format!("Failed to write to: {}", output_path.display()))?;
    } else {
        io::stdout()
            .write_all(output_content.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Config file and environment, then command-line flags on top
fn load_config(cli: &Cli) -> Result<FlattenConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = FlattenConfig::load_from_file(path).map_err(FlattenError::from)?;
            config.apply_env_overrides();
            config
        }
        None => FlattenConfig::load().map_err(FlattenError::from)?,
    };

    if let Some(format) = cli.format {
        config.general.format = format.into();
    }
    if let Some(delimiter) = &cli.delimiter {
        config.output.delimiter = config::unescape_delimiter(delimiter);
    }
    if cli.no_header {
        config.output.header = false;
    }
    if cli.strict {
        config.parse.strictness = Strictness::Strict;
    }
    if let Some(mode) = cli.prefix_match {
        config.parse.prefix_match = mode.into();
    }
    if let Some(ns) = &cli.fallback_ns {
        config.output.fallback_namespace = ns.clone();
    }
    if cli.verbose {
        config.general.log_level = LogLevel::Verbose;
    }
    if cli.quiet {
        config.general.log_level = LogLevel::Quiet;
    }

    Ok(config)
}

/// Log to stderr; `RUST_LOG` takes precedence over the configured level
fn init_tracing(cli: &Cli, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(cli.verbose)
        .init();
}

fn read_input(cli: &Cli) -> Result<String> {
    let mut content = String::new();

    match &cli.input {
        Some(path) if !cli.stdin => {
            content = fs::read_to_string(path)
                .map_err(|e| FlattenError::from(e).at(path.display().to_string()))
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
        }
        _ => {
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read from stdin")?;
        }
    }

    Ok(content)
}
