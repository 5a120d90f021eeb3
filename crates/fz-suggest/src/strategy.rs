//! Hooks that let a match strategy reshape the suggester's lookup pipeline.

use fz_automaton::Automaton;

use crate::{SuggestError, index::SuggestFst, paths::FstPath, tokens::TokenStreamToAutomaton};

/// Extension points called by [`Suggester`](crate::Suggester) while building and querying.
///
/// Every method has an exact-match default. Implementations hold only immutable
/// configuration, so one strategy value may serve concurrent lookups.
pub trait MatchStrategy {
    /// Converter used for both entries and lookup keys.
    fn token_converter(&self, base: TokenStreamToAutomaton) -> TokenStreamToAutomaton {
        base
    }

    /// Maps an automaton from the converter's alphabet onto FST bytes.
    fn convert_automaton(&self, a: Automaton) -> Automaton {
        a
    }

    /// Automaton whose language the lookup should match, in the converter's alphabet.
    fn build_match_automaton(&self, lookup: &Automaton) -> Result<Automaton, SuggestError> {
        Ok(lookup.clone())
    }

    /// Returns the FST paths to complete for `lookup`.
    ///
    /// `prefix_paths` are the paths matched exactly by the lookup automaton,
    /// which is still in the converter's alphabet.
    fn full_prefix_paths(
        &self,
        prefix_paths: Vec<FstPath>,
        _lookup: &Automaton,
        _fst: &SuggestFst,
    ) -> Result<Vec<FstPath>, SuggestError> {
        Ok(prefix_paths)
    }
}

/// Plain prefix completion with no edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactMatch;

impl MatchStrategy for ExactMatch {}
