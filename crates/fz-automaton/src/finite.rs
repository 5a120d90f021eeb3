//! Enumeration of the accepted sequences of a finite-language automaton.

use crate::automaton::{Automaton, INITIAL_STATE, StateId};

/// One level of the depth-first walk.
struct Frame {
    /// State whose transitions are being explored.
    state: StateId,
    /// Index of the transition currently being expanded.
    transition: usize,
    /// Next symbol to emit from the current transition's range.
    symbol: u64,
}

/// Returns every sequence accepted by `a`, up to `limit` sequences.
///
/// Ranges are expanded symbol by symbol. Sequences come out in depth-first
/// order; a nondeterministic automaton may yield the same sequence more than
/// once. `limit = None` enumerates everything.
///
/// `a` must be acyclic, as it is after [`remove_dead_states`](crate::remove_dead_states)
/// on any finite language. Debug builds panic on the first revisited state.
pub fn finite_strings(a: &Automaton, limit: Option<usize>) -> Vec<Vec<u32>> {
    let mut results = Vec::new();
    if limit == Some(0) {
        return results;
    }

    let mut on_path = vec![false; a.num_states()];
    let mut path: Vec<u32> = Vec::new();

    if a.is_accept(INITIAL_STATE) {
        results.push(Vec::new());
        if limit.is_some_and(|l| results.len() >= l) {
            return results;
        }
    }

    on_path[INITIAL_STATE] = true;
    let mut stack = vec![Frame {
        state: INITIAL_STATE,
        transition: 0,
        symbol: first_symbol(a, INITIAL_STATE, 0),
    }];

    while let Some(frame) = stack.last_mut() {
        let transitions = a.transitions(frame.state);
        let Some(t) = transitions.get(frame.transition).copied() else {
            on_path[frame.state] = false;
            stack.pop();
            path.pop();
            continue;
        };

        if frame.symbol > u64::from(t.max) {
            frame.transition += 1;
            frame.symbol = first_symbol(a, frame.state, frame.transition);
            continue;
        }

        // The range bound check above keeps the symbol within u32.
        let symbol = frame.symbol as u32;
        frame.symbol += 1;

        debug_assert!(
            !on_path[t.dest],
            "automaton accepts an infinite language (cycle through state {})",
            t.dest
        );

        path.push(symbol);
        if a.is_accept(t.dest) {
            results.push(path.clone());
            if limit.is_some_and(|l| results.len() >= l) {
                break;
            }
        }

        on_path[t.dest] = true;
        stack.push(Frame {
            state: t.dest,
            transition: 0,
            symbol: first_symbol(a, t.dest, 0),
        });
    }

    results
}

/// Lower bound of transition `index` of `state`, or zero past the end.
fn first_symbol(a: &Automaton, state: StateId, index: usize) -> u64 {
    a.transitions(state)
        .get(index)
        .map_or(0, |t| u64::from(t.min))
}
