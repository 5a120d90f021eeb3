//! FST-backed analyzing suggester with fuzzy prefix matching.
//!
//! This crate provides:
//! - Text analysis into token graphs (tantivy tokenizers plus single-token synonyms)
//! - Conversion of token graphs into automata over bytes or code points
//! - An FST of `analyzed ++ END_BYTE ++ surface` keys weighted by cost
//! - Prefix matching of automata against the FST and best-first completion
//! - A suggester parameterized by a [`MatchStrategy`], with exact and fuzzy strategies
//! - Saving and reopening built suggesters
//!
//! # Example
//!
//! ```no_run
//! use fz_config::AnalysisSettings;
//! use fz_suggest::{Analyzer, FuzzySuggester, FuzzyStrategy, SuggestEntry, SuggesterOptions};
//!
//! let analyzer = Analyzer::from_settings(&AnalysisSettings::default()).unwrap();
//! let entries = [SuggestEntry::new("cat", 10), SuggestEntry::new("catalog", 3)];
//! let suggester = FuzzySuggester::build(
//!     analyzer,
//!     SuggesterOptions::default(),
//!     FuzzyStrategy::default(),
//!     &entries,
//! )
//! .unwrap();
//!
//! // One substitution away from "cat".
//! let results = suggester.lookup("cot", 5).unwrap();
//! assert_eq!(results[0].key, "cat");
//! ```

#![warn(missing_docs)]

mod analyzer;
mod entry;
mod error;
pub mod fuzzy;
mod index;
mod paths;
mod strategy;
mod suggester;
mod tokens;
mod topn;

pub use analyzer::{AnalyzedToken, Analyzer, parse_language};
pub use entry::{DEFAULT_WEIGHT, parse_entries, read_entries};
pub use error::SuggestError;
pub use fuzzy::{FuzzyConfig, FuzzyStrategy, FuzzySuggester, build_fuzzy_automaton};
pub use index::{SuggestFst, SuggestIndex, cost_to_weight, split_key, weight_to_cost};
pub use paths::{FstPath, intersect_prefix_paths};
pub use strategy::{ExactMatch, MatchStrategy};
pub use suggester::{
    DEFAULT_MAX_SURFACE_FORMS, Explanation, FORMAT_VERSION, Manifest, SuggestEntry, Suggester,
    SuggesterOptions, Suggestion, settings_hash,
};
pub use tokens::{END_BYTE, SEP_LABEL, TokenStreamToAutomaton};
pub use topn::{Completion, TopNSearcher};
