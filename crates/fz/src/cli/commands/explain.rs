//! Implementation of `fz explain`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};

use crate::cli::{args::ExplainCommand, context::CommandContext};

/// Prints the automata statistics for one input.
pub fn run(ctx: &CommandContext, cmd: &ExplainCommand) -> ExitCode {
    let strategy = match ctx.strategy(&cmd.matching) {
        Ok(strategy) => strategy,
        Err(code) => return code,
    };
    let suggester = match ctx.suggester(&cmd.source, strategy) {
        Ok(suggester) => suggester,
        Err(code) => return code,
    };
    let explanation = match suggester.explain(&cmd.query) {
        Ok(explanation) => explanation,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return match serde_json::to_string_pretty(&explanation) {
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

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Stage", "Value"]);
    table.add_row(vec![
        Cell::new("Tokens"),
        Cell::new(explanation.tokens.join(" ")),
    ]);
    table.add_row(vec![
        Cell::new("Lookup paths"),
        Cell::new(explanation.lookup_paths),
    ]);
    table.add_row(vec![
        Cell::new("Lookup states"),
        Cell::new(explanation.lookup_states),
    ]);
    table.add_row(vec![
        Cell::new("Match states"),
        Cell::new(explanation.match_states),
    ]);
    table.add_row(vec![
        Cell::new("Match transitions"),
        Cell::new(explanation.match_transitions),
    ]);
    table.add_row(vec![
        Cell::new("Deterministic"),
        Cell::new(if explanation.deterministic { "yes" } else { "no" }),
    ]);
    table.add_row(vec![
        Cell::new("Prefix paths"),
        Cell::new(explanation.prefix_paths),
    ]);
    println!("{table}");
    ExitCode::SUCCESS
}
