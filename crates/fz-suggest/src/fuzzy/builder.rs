//! Construction of the fuzzy match automaton from a lookup automaton.

use fz_automaton::{Automaton, LevenshteinAutomata, concatenate, determinize, finite_strings, union};
use tracing::{debug, trace};

use super::FuzzyConfig;
use crate::SuggestError;

/// Builds an automaton accepting every sequence within `config.max_edits()` edits of a
/// path accepted by `lookup`.
///
/// Each path of `lookup` keeps its first `non_fuzzy_prefix` symbols exact. Paths no
/// longer than the prefix, or shorter than `min_fuzzy_length`, get no edits at all.
/// `lookup` must accept a finite language.
pub fn build_fuzzy_automaton(
    config: &FuzzyConfig,
    lookup: &Automaton,
) -> Result<Automaton, SuggestError> {
    // One past the limit is enough to tell that it was exceeded.
    let paths = finite_strings(lookup, config.max_paths().map(|limit| limit.saturating_add(1)));
    if let Some(limit) = config.max_paths()
        && paths.len() > limit
    {
        return Err(SuggestError::TooManyPaths { limit });
    }

    let mut automata: Vec<Automaton> = paths.iter().map(|path| path_automaton(config, path)).collect();
    debug!(paths = automata.len(), "built per-path fuzzy automata");

    let fuzzy = match automata.len() {
        0 => Automaton::empty(),
        1 => automata.swap_remove(0),
        _ => determinize(&union(&automata)),
    };
    trace!(
        states = fuzzy.num_states(),
        transitions = fuzzy.num_transitions(),
        "fuzzy automaton ready"
    );
    Ok(fuzzy)
}

/// Automaton for a single path.
fn path_automaton(config: &FuzzyConfig, path: &[u32]) -> Automaton {
    let prefix_len = config.non_fuzzy_prefix();
    if path.len() <= prefix_len || path.len() < config.min_fuzzy_length() {
        return Automaton::from_symbols(path);
    }

    let (prefix, suffix) = path.split_at(prefix_len);
    let edits = LevenshteinAutomata::new(suffix, config.alphabet_max(), config.transpositions())
        .to_automaton(config.max_edits());
    // The exact prefix ends in a state with no outgoing edges, so the seam adds no overlap.
    concatenate(&Automaton::from_symbols(prefix), &edits).assume_deterministic()
}
