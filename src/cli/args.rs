//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, details::DetailsArgs,
    matrix::MatrixArgs, select::SelectArgs,
};
use crate::core::PartRef;

#[derive(Parser)]
#[command(name = "repmat")]
#[command(author, version, about = "Repair parts matrix and selection toolkit")]
#[command(
    long_about = "Builds a repair-type × category matrix from a parts catalog, \
                  tracks part selections and overlays pricing data."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose (debug) logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the repair-type × category matrix of a catalog
    Matrix(MatrixArgs),

    /// Select parts and print the resulting selection
    Select(SelectArgs),

    /// Show the details payload for one priced part
    Details(DetailsArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Selection inputs shared by commands that replay selection events
#[derive(clap::Args, Clone, Debug, Default)]
pub struct SelectionOpts {
    /// Select every part of a category (repeatable)
    #[arg(long = "category", short = 'c', value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Select one part: CATEGORY/TOR/PART[/SOS] (repeatable)
    #[arg(long = "part", short = 'p', value_name = "REF")]
    pub parts: Vec<PartRef>,

    /// Deselect one part after selections are applied (repeatable)
    #[arg(long = "deselect", value_name = "REF")]
    pub deselect: Vec<PartRef>,

    /// Quantity applied to every selected part
    #[arg(long = "qty", value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: Option<u32>,

    /// Price/availability file overlaid after selection
    #[arg(long)]
    pub prices: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically pick a format for the command (table or yaml)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Parse a configured default format name, ignoring unknown values
    pub fn from_config(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| OutputFormat::from_str(v, true).ok())
    }
}
