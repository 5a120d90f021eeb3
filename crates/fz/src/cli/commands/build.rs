//! Implementation of `fz build`.

use std::process::ExitCode;

use fz_suggest::{ExactMatch, Suggester};
use tracing::info;

use crate::cli::{
    args::BuildCommand,
    context::{CliStrategy, CommandContext, read_entries_or_failure},
};

/// Builds an index from an entries file and saves it.
pub fn run(ctx: &CommandContext, cmd: &BuildCommand) -> ExitCode {
    let Some(entries_path) = cmd.entries.clone().or_else(|| ctx.config.index.entries.clone())
    else {
        eprintln!("error: no entries file given");
        eprintln!("Pass an entries file, or set [index] entries in .fz.toml.");
        return ExitCode::FAILURE;
    };
    let Some(output) = cmd.output.clone().or_else(|| ctx.config.index.path.clone()) else {
        eprintln!("error: no output directory given");
        eprintln!("Pass -o, or set [index] path in .fz.toml.");
        return ExitCode::FAILURE;
    };

    let entries = match read_entries_or_failure(&entries_path) {
        Ok(entries) => entries,
        Err(code) => return code,
    };
    let analyzer = match ctx.analyzer() {
        Ok(analyzer) => analyzer,
        Err(code) => return code,
    };

    // Keys do not depend on the lookup strategy.
    let strategy = CliStrategy::Exact(ExactMatch);

    let suggester = match Suggester::build(analyzer, ctx.options(), strategy, &entries) {
        Ok(suggester) => suggester,
        Err(e) => {
            eprintln!("error: failed to build suggester: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = suggester.save(&output) {
        eprintln!("error: failed to write {}: {e}", output.display());
        return ExitCode::FAILURE;
    }

    info!(entries = suggester.entry_count(), keys = suggester.len(), "index written");
    println!(
        "Indexed {} entries ({} keys) into {}",
        suggester.entry_count(),
        suggester.len(),
        output.display()
    );
    ExitCode::SUCCESS
}
