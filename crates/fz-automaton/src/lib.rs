//! Finite automata over `u32` symbols.
//!
//! This crate provides the automaton value type used by the suggester, the
//! algebra over it ([`concatenate`], [`union`], [`determinize`],
//! [`remove_dead_states`], [`finite_strings`]), an edit-distance automaton
//! generator ([`LevenshteinAutomata`]) and a code-point to UTF-8 byte converter
//! ([`utf32_to_utf8`]).
//!
//! Symbols are either bytes or Unicode code points; the automaton itself does
//! not care which. Every operation is infallible and returns a fresh value.

#![warn(missing_docs)]

mod automaton;
mod finite;
pub mod levenshtein;
mod ops;
pub mod utf8;

pub use automaton::{Automaton, Builder, INITIAL_STATE, StateId, Transition};
pub use finite::finite_strings;
pub use levenshtein::{LevenshteinAutomata, MAXIMUM_SUPPORTED_DISTANCE};
pub use ops::{concatenate, determinize, remove_dead_states, union};
pub use utf8::utf32_to_utf8;
