//! Fuzzy prefix matching.
//!
//! A lookup automaton is split into its paths; each path becomes an exact prefix followed
//! by an edit-distance automaton over the rest, and the per-path automata are unioned.

mod builder;
mod config;
mod strategy;

pub use builder::build_fuzzy_automaton;
pub use config::{
    DEFAULT_MAX_EDITS, DEFAULT_MIN_FUZZY_LENGTH, DEFAULT_NON_FUZZY_PREFIX, DEFAULT_TRANSPOSITIONS,
    DEFAULT_UNICODE_AWARE, FuzzyConfig,
};
pub use strategy::FuzzyStrategy;

use crate::Suggester;

/// Suggester that tolerates typos.
pub type FuzzySuggester = Suggester<FuzzyStrategy>;
