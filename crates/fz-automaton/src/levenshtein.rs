//! Edit-distance automata.
//!
//! The construction is the textbook position × edits NFA: state `(i, e)` means
//! `i` symbols of the target consumed with `e` edits spent. Deletions are
//! epsilon moves `(i, e) -> (i + 1, e + 1)`; they are folded into each state's
//! closure so the NFA handed to [`determinize`] is epsilon-free.

use tracing::trace;

use crate::{
    automaton::{Automaton, Builder, StateId},
    ops::{determinize, remove_dead_states},
};

/// Largest edit distance [`LevenshteinAutomata::to_automaton`] is meant for.
///
/// The construction works for any distance, but automaton size grows quickly
/// and the fuzzy configuration rejects anything above this cap.
pub const MAXIMUM_SUPPORTED_DISTANCE: u8 = 2;

/// Builds automata accepting every sequence within a bounded edit distance of
/// a target sequence.
#[derive(Debug, Clone)]
pub struct LevenshteinAutomata {
    /// Target sequence.
    word: Vec<u32>,
    /// Largest symbol "any symbol" edges cover.
    alphabet_max: u32,
    /// Whether swapping two adjacent symbols counts as a single edit.
    transpositions: bool,
}

impl LevenshteinAutomata {
    /// Creates a generator for `word` over the alphabet `0..=alphabet_max`.
    ///
    /// With `transpositions` an adjacent swap costs one edit (restricted
    /// Damerau-Levenshtein); without it a swap costs two.
    pub fn new(word: &[u32], alphabet_max: u32, transpositions: bool) -> Self {
        Self {
            word: word.to_vec(),
            alphabet_max,
            transpositions,
        }
    }

    /// Returns a deterministic automaton accepting every sequence within
    /// `max_distance` edits of the target.
    pub fn to_automaton(&self, max_distance: u8) -> Automaton {
        if max_distance == 0 {
            return Automaton::from_symbols(&self.word);
        }

        let nfa = self.nfa(usize::from(max_distance));
        let dfa = remove_dead_states(&determinize(&nfa));
        trace!(
            target_len = self.word.len(),
            max_distance,
            transpositions = self.transpositions,
            nfa_states = nfa.num_states(),
            dfa_states = dfa.num_states(),
            "built levenshtein automaton"
        );
        dfa
    }

    /// Builds the epsilon-free NFA for distance `d`.
    fn nfa(&self, d: usize) -> Automaton {
        let n = self.word.len();
        let grid = NfaGrid { n, d };

        let mut builder = Builder::new();
        for _ in 0..grid.total_states() {
            builder.create_state();
        }

        for i in 0..=n {
            for e in 0..=d {
                let from = grid.position(i, e);
                // Deletion closure: skipping target symbols costs one edit each.
                for skipped in 0..=(d - e).min(n - i) {
                    let (ci, ce) = (i + skipped, e + skipped);
                    if ci == n {
                        builder.set_accept(from, true);
                    }
                    self.add_edges(&mut builder, &grid, from, ci, ce);
                }
            }
        }

        builder.finish()
    }

    /// Adds the consuming edges of grid state `(i, e)` as outgoing edges of
    /// `from`.
    fn add_edges(&self, builder: &mut Builder, grid: &NfaGrid, from: StateId, i: usize, e: usize) {
        let (n, d) = (grid.n, grid.d);

        if i < n {
            builder.add_transition(from, grid.position(i + 1, e), self.word[i]);
        }
        if e == d {
            return;
        }

        // Insertion.
        builder.add_range(from, grid.position(i, e + 1), 0, self.alphabet_max);
        if i < n {
            // Substitution.
            builder.add_range(from, grid.position(i + 1, e + 1), 0, self.alphabet_max);
        }

        if self.transpositions && i + 1 < n && self.word[i] != self.word[i + 1] {
            let swap = grid.transposition(i, e);
            builder.add_transition(from, swap, self.word[i + 1]);
            builder.add_transition(swap, grid.position(i + 2, e + 1), self.word[i]);
        }
    }
}

/// State numbering for the NFA.
///
/// Grid states `(i, e)` come first, followed by one transposition state per
/// `(i, e)` with `e < d`, which has read `word[i + 1]` and waits for `word[i]`.
struct NfaGrid {
    /// Target length.
    n: usize,
    /// Maximum distance.
    d: usize,
}

impl NfaGrid {
    /// Number of grid states.
    fn grid_states(&self) -> usize {
        (self.n + 1) * (self.d + 1)
    }

    /// Total number of NFA states including transposition states.
    fn total_states(&self) -> usize {
        self.grid_states() + self.n * self.d
    }

    /// Id of grid state `(i, e)`.
    fn position(&self, i: usize, e: usize) -> StateId {
        i * (self.d + 1) + e
    }

    /// Id of the transposition state leaving `(i, e)`.
    fn transposition(&self, i: usize, e: usize) -> StateId {
        self.grid_states() + i * self.d + e
    }
}
