//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, cost::CostArgs, ing::IngCommands, init::InitArgs,
    recipe::RecipeCommands,
};

#[derive(Parser)]
#[command(name = "brigade")]
#[command(author, version, about = "Brigade restaurant back-office toolkit")]
#[command(
    long_about = "A toolkit for managing restaurant recipes and ingredients as plain text files under git version control, with built-in food-cost analysis."
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

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .brigade/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new Brigade project
    Init(InitArgs),

    /// Ingredient management (priced pantry items)
    #[command(subcommand)]
    Ing(IngCommands),

    /// Recipe management (lines, sub-recipes, pricing)
    #[command(subcommand)]
    Recipe(RecipeCommands),

    /// Compute cost and margin metrics for a recipe
    Cost(CostArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
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
    /// Just IDs, one per line
    Id,
}
