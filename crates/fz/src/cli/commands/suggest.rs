//! Implementation of `fz suggest`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use fz_suggest::Suggestion;
use serde::Serialize;
use tracing::debug;

use crate::cli::{args::SuggestCommand, context::CommandContext};

/// JSON output for a single query's suggestions.
#[derive(Serialize)]
struct JsonQuerySuggestions {
    /// The input as typed.
    query: String,
    /// Suggestions in rank order.
    suggestions: Vec<Suggestion>,
}

/// JSON output for `fz suggest --json`.
#[derive(Serialize)]
struct JsonSuggestOutput {
    /// Suggestions grouped by query.
    queries: Vec<JsonQuerySuggestions>,
}

/// Looks up suggestions for each query.
pub fn run(ctx: &CommandContext, cmd: &SuggestCommand) -> ExitCode {
    let strategy = match ctx.strategy(&cmd.matching) {
        Ok(strategy) => strategy,
        Err(code) => return code,
    };
    let suggester = match ctx.suggester(&cmd.source, strategy) {
        Ok(suggester) => suggester,
        Err(code) => return code,
    };
    let limit = cmd.limit.unwrap_or(ctx.config.suggest.limit);

    let mut queries = Vec::with_capacity(cmd.queries.len());
    for query in &cmd.queries {
        match suggester.lookup(query, limit) {
            Ok(suggestions) => {
                debug!(query = %query, hits = suggestions.len(), "lookup");
                queries.push(JsonQuerySuggestions {
                    query: query.clone(),
                    suggestions,
                });
            }
            Err(e) => {
                eprintln!("error: lookup failed for '{query}': {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if cmd.json {
        let output = JsonSuggestOutput { queries };
        return match serde_json::to_string_pretty(&output) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let multiple = queries.len() > 1;
    for result in &queries {
        if multiple {
            println!("{}:", result.query);
        }
        if result.suggestions.is_empty() {
            println!("No suggestions.");
            continue;
        }
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec!["Suggestion", "Weight"]);
        for suggestion in &result.suggestions {
            table.add_row(vec![
                Cell::new(&suggestion.key),
                Cell::new(suggestion.weight),
            ]);
        }
        println!("{table}");
    }
    ExitCode::SUCCESS
}
