//! The fuzzy [`MatchStrategy`].

use fz_automaton::{Automaton, determinize, utf32_to_utf8};

use super::{FuzzyConfig, build_fuzzy_automaton};
use crate::{
    SuggestError,
    index::SuggestFst,
    paths::{FstPath, intersect_prefix_paths},
    strategy::MatchStrategy,
    tokens::TokenStreamToAutomaton,
};

/// Matches keys within a bounded edit distance of the lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzyStrategy {
    /// Matching parameters.
    config: FuzzyConfig,
}

impl FuzzyStrategy {
    /// Creates a strategy from validated parameters.
    pub fn new(config: FuzzyConfig) -> Self {
        Self { config }
    }

    /// Matching parameters.
    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }
}

impl MatchStrategy for FuzzyStrategy {
    fn token_converter(&self, base: TokenStreamToAutomaton) -> TokenStreamToAutomaton {
        base.with_unicode_arcs(self.config.unicode_aware())
    }

    fn build_match_automaton(&self, lookup: &Automaton) -> Result<Automaton, SuggestError> {
        build_fuzzy_automaton(&self.config, lookup)
    }

    fn convert_automaton(&self, a: Automaton) -> Automaton {
        if self.config.unicode_aware() {
            determinize(&utf32_to_utf8(&a))
        } else {
            a
        }
    }

    fn full_prefix_paths(
        &self,
        _prefix_paths: Vec<FstPath>,
        lookup: &Automaton,
        fst: &SuggestFst,
    ) -> Result<Vec<FstPath>, SuggestError> {
        let fuzzy = self.build_match_automaton(lookup)?;
        let bytes = self.convert_automaton(fuzzy);
        Ok(intersect_prefix_paths(&bytes, fst))
    }
}
