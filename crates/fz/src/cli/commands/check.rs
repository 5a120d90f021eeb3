//! Implementation of `fz check`.

use std::process::ExitCode;

use fz_config::{ConfigWarning, discover_config_files};
use fz_suggest::{Analyzer, FuzzyConfig};

use crate::cli::context::CommandContext;

/// Exit codes for `fz check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
    /// Configuration has errors and cannot be used.
    pub const ERROR: ExitCode = ExitCode::FAILURE;
}

/// Validates the loaded configuration and reports problems.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);

    println!("Checking configuration...");
    println!();

    if config_files.is_empty() {
        println!("No configuration files found; using defaults.");
        println!();
    } else {
        println!("Config files:");
        for path in &config_files {
            println!("  {}", path.display());
        }
        println!();
    }

    let config = &ctx.config;
    let mut errors = Vec::new();
    if let Err(e) = FuzzyConfig::from_settings(&config.fuzzy) {
        errors.push(format!("fuzzy: {e}"));
    }
    if let Err(e) = Analyzer::from_settings(&config.analysis) {
        errors.push(format!("analysis: {e}"));
    }

    println!("Index:");
    match (&config.index.path, &config.index.entries) {
        (None, None) => println!("  (none configured)"),
        (path, entries) => {
            if let Some(path) = path {
                let status = if path.join("manifest.json").is_file() {
                    "ok"
                } else {
                    "not built"
                };
                println!("  path [{status}] -> {}", path.display());
            }
            if let Some(entries) = entries {
                let status = if entries.is_file() { "ok" } else { "missing" };
                println!("  entries [{status}] -> {}", entries.display());
            }
        }
    }
    println!();

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("error: {error}");
        }
        return exit_codes::ERROR;
    }

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return exit_codes::OK;
    }

    println!("Warnings ({}):", warnings.len());
    for warning in &warnings {
        println!("  - {warning}");
    }
    println!();
    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|warning| match warning {
            ConfigWarning::FuzzinessDisabled => {
                "Set fuzzy.max_edits to 1 or 2, or use `--exact` when exact matching is intended."
            }
            ConfigWarning::ZeroLimit => "Set suggest.limit to a positive number.",
            ConfigWarning::SynonymToItself { .. } => {
                "Remove the self-referencing synonym from [analysis.synonyms]."
            }
            ConfigWarning::MinLengthShadowedByPrefix { .. } => {
                "Lower fuzzy.non_fuzzy_prefix or raise fuzzy.min_fuzzy_length."
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
