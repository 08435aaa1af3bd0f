//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::column_cmd::{self, ColumnArgs};
use super::output::{Output, OutputFormat};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "mcol")]
#[command(author, version, about = "Parse, validate and format board column values")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported column types
    Types,

    /// Decode a raw API value
    Decode {
        /// Column type name or platform tag (e.g. status, color)
        column_type: String,

        #[command(flatten)]
        column: ColumnOpts,
    },

    /// Assign an input to a column value
    Set {
        /// Column type name or platform tag
        column_type: String,

        /// Input to assign, as JSON (bare words are taken as strings)
        input: String,

        #[command(flatten)]
        column: ColumnOpts,
    },

    /// Build the column_values payload from a column listing file
    Payload {
        /// JSON array of {id, title, type, settings_str?, value?}
        path: PathBuf,
    },
}

/// Options shared by commands that build a single column value
#[derive(clap::Args)]
pub struct ColumnOpts {
    /// Column id
    #[arg(long, default_value = "column")]
    pub id: String,

    /// Column title
    #[arg(long, default_value = "Column")]
    pub title: String,

    /// Raw API value string
    #[arg(long)]
    pub value: Option<String>,

    /// Column settings string
    #[arg(long)]
    pub settings: Option<String>,
}

impl ColumnOpts {
    fn args<'a>(&'a self, column_type: &'a str) -> ColumnArgs<'a> {
        ColumnArgs {
            column_type,
            id: &self.id,
            title: &self.title,
            value: self.value.as_deref(),
            settings: self.settings.as_deref(),
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let format = cli.format.unwrap_or(config.default_format);
    let output = Output::new(format, cli.verbose).with_pretty(config.pretty);

    output.verbose("mcol starting");

    match &cli.command {
        Commands::Types => column_cmd::types(&output)?,

        Commands::Decode {
            column_type,
            column,
        } => column_cmd::decode(&output, &column.args(column_type))?,

        Commands::Set {
            column_type,
            input,
            column,
        } => column_cmd::set(&output, &column.args(column_type), input)?,

        Commands::Payload { path } => {
            output.verbose_ctx("payload", &format!("Reading {}", path.display()));
            column_cmd::payload(&output, path)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
