//! Clap argument definitions for the `fz` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "fz")]
#[command(about = "Fuzzy prefix suggestions from an FST index")]
pub struct Cli {
    /// Log verbosity (-v for debug, -vv for trace), written to stderr
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Where suggestions come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Saved index directory [default: index.path from config]
    #[arg(long, conflicts_with = "entries")]
    pub index: Option<PathBuf>,

    /// Entries file to build an in-memory index from [default: index.entries from config]
    #[arg(long)]
    pub entries: Option<PathBuf>,
}

/// Overrides for fuzzy matching settings.
#[derive(Args, Debug, Clone, Default)]
pub struct MatchArgs {
    /// Match exact prefixes only
    #[arg(long, conflicts_with_all = ["max_edits", "prefix", "min_length", "unicode"])]
    pub exact: bool,

    /// Maximum edits (0-2) [default: 1]
    #[arg(long, allow_negative_numbers = true)]
    pub max_edits: Option<i64>,

    /// Leading characters that must match exactly [default: 1]
    #[arg(long, allow_negative_numbers = true)]
    pub prefix: Option<i64>,

    /// Minimum input length before edits are allowed [default: 3]
    #[arg(long, allow_negative_numbers = true)]
    pub min_length: Option<i64>,

    /// Count edits in Unicode characters instead of bytes
    #[arg(long)]
    pub unicode: bool,

    /// Count a swap of adjacent characters as two edits
    #[arg(long)]
    pub no_transpositions: bool,
}

/// Arguments for `fz build`.
#[derive(Args, Debug, Clone)]
pub struct BuildCommand {
    /// Entries file: one `surface<TAB>weight` per line [default: index.entries from config]
    pub entries: Option<PathBuf>,

    /// Output directory [default: index.path from config]
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `fz suggest`.
#[derive(Args, Debug, Clone)]
pub struct SuggestCommand {
    /// Partial inputs to complete
    #[arg(required = true)]
    pub queries: Vec<String>,

    #[command(flatten)]
    /// Suggestion source.
    pub source: SourceArgs,

    #[command(flatten)]
    /// Matching overrides.
    pub matching: MatchArgs,

    /// Suggestions per query [default: suggest.limit from config]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `fz explain`.
#[derive(Args, Debug, Clone)]
pub struct ExplainCommand {
    /// Input to explain
    pub query: String,

    #[command(flatten)]
    /// Suggestion source.
    pub source: SourceArgs,

    #[command(flatten)]
    /// Matching overrides.
    pub matching: MatchArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Supported `fz` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Build and save an index from an entries file
    Build(BuildCommand),

    /// Suggest completions for partial inputs
    #[command(after_help = "\
EXAMPLES:
  fz suggest --entries words.tsv cst
  fz suggest --index ./index --max-edits 2 'new yrok'
  fz suggest --entries words.tsv --unicode cafe
  fz suggest --entries words.tsv --exact ca")]
    Suggest(SuggestCommand),

    /// Show how an input is turned into automata
    Explain(ExplainCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and diagnose issues
    Check,
}
