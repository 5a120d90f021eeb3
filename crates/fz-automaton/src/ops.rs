//! Algebraic operations over automata.
//!
//! All operations are epsilon-free and return fresh automata; inputs are only
//! borrowed.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::automaton::{Automaton, INITIAL_STATE, State, StateId, Transition};

/// Returns an automaton accepting every `x ++ y` with `x` accepted by `a` and `y`
/// accepted by `b`.
///
/// Each accepting state of `a` receives a copy of `b`'s initial transitions and
/// takes over `b`'s initial accept flag. The result is not flagged
/// deterministic: when `a` is an exact string its accepting state has no
/// outgoing edges and the result is deterministic whenever `b` is, which
/// callers may assert with [`Automaton::assume_deterministic`].
pub fn concatenate(a: &Automaton, b: &Automaton) -> Automaton {
    let offset = a.states.len();
    let b_initial = &b.states[INITIAL_STATE];
    let shifted_initial: Vec<Transition> = b_initial
        .transitions
        .iter()
        .map(|t| shift(*t, offset))
        .collect();

    let mut states = Vec::with_capacity(a.states.len() + b.states.len());
    for state in &a.states {
        let mut copy = state.clone();
        if state.accept {
            copy.accept = b_initial.accept;
            copy.transitions.extend_from_slice(&shifted_initial);
            copy.transitions.sort_unstable();
        }
        states.push(copy);
    }
    states.extend(b.states.iter().map(|state| State {
        accept: state.accept,
        transitions: state.transitions.iter().map(|t| shift(*t, offset)).collect(),
    }));

    Automaton {
        states,
        deterministic: false,
    }
}

/// Returns an automaton accepting the union of the languages of `automata`.
///
/// A fresh initial state carries the initial transitions of every operand. An
/// empty slice yields [`Automaton::empty`].
pub fn union(automata: &[Automaton]) -> Automaton {
    if automata.is_empty() {
        return Automaton::empty();
    }

    let mut states = vec![State::default()];
    for automaton in automata {
        let offset = states.len();
        let initial = &automaton.states[INITIAL_STATE];
        states[INITIAL_STATE].accept |= initial.accept;
        states[INITIAL_STATE]
            .transitions
            .extend(initial.transitions.iter().map(|t| shift(*t, offset)));
        states.extend(automaton.states.iter().map(|state| State {
            accept: state.accept,
            transitions: state.transitions.iter().map(|t| shift(*t, offset)).collect(),
        }));
    }
    states[INITIAL_STATE].transitions.sort_unstable();

    Automaton {
        states,
        deterministic: false,
    }
}

/// Returns a deterministic automaton accepting the same language as `a`.
///
/// Uses subset construction over symbol intervals: the outgoing ranges of all
/// member states are cut at every range boundary, and each elementary interval
/// maps to the set of states reachable on it. Automata already flagged
/// deterministic are returned as a clone.
pub fn determinize(a: &Automaton) -> Automaton {
    if a.deterministic {
        return a.clone();
    }

    let mut states: Vec<State> = Vec::new();
    let mut ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
    let mut queue: VecDeque<Vec<StateId>> = VecDeque::new();

    let start = vec![INITIAL_STATE];
    ids.insert(start.clone(), 0);
    states.push(State::default());
    queue.push_back(start);

    while let Some(set) = queue.pop_front() {
        let id = ids[&set];
        let accept = set.iter().any(|&s| a.states[s].accept);

        let mut edges: Vec<Transition> = set
            .iter()
            .flat_map(|&s| a.states[s].transitions.iter().copied())
            .collect();
        edges.sort_unstable();

        let mut points: Vec<u64> = edges
            .iter()
            .flat_map(|t| [u64::from(t.min), u64::from(t.max) + 1])
            .collect();
        points.sort_unstable();
        points.dedup();

        let mut transitions: Vec<Transition> = Vec::new();
        for window in points.windows(2) {
            let (lo, hi) = (window[0], window[1] - 1);
            let mut dests: Vec<StateId> = edges
                .iter()
                .filter(|t| u64::from(t.min) <= lo && hi <= u64::from(t.max))
                .map(|t| t.dest)
                .collect();
            if dests.is_empty() {
                continue;
            }
            dests.sort_unstable();
            dests.dedup();

            let dest = match ids.get(&dests) {
                Some(&existing) => existing,
                None => {
                    let fresh = states.len();
                    states.push(State::default());
                    ids.insert(dests.clone(), fresh);
                    queue.push_back(dests);
                    fresh
                }
            };

            // Points come from u32 values, so both bounds fit back into u32.
            let (lo, hi) = (lo as u32, hi as u32);
            match transitions.last_mut() {
                Some(last) if last.dest == dest && last.max.checked_add(1) == Some(lo) => {
                    last.max = hi;
                }
                _ => transitions.push(Transition {
                    min: lo,
                    max: hi,
                    dest,
                }),
            }
        }

        states[id] = State {
            accept,
            transitions,
        };
    }

    trace!(
        input_states = a.states.len(),
        output_states = states.len(),
        "determinized automaton"
    );

    Automaton {
        states,
        deterministic: true,
    }
}

/// Removes states that are unreachable from the initial state or cannot reach
/// an accepting state.
///
/// The initial state is always kept, so an automaton accepting nothing
/// collapses to [`Automaton::empty`]. The deterministic flag is preserved.
pub fn remove_dead_states(a: &Automaton) -> Automaton {
    let n = a.states.len();

    let mut reachable = vec![false; n];
    let mut stack = vec![INITIAL_STATE];
    reachable[INITIAL_STATE] = true;
    while let Some(state) = stack.pop() {
        for t in &a.states[state].transitions {
            if !reachable[t.dest] {
                reachable[t.dest] = true;
                stack.push(t.dest);
            }
        }
    }

    let mut incoming: Vec<Vec<StateId>> = vec![Vec::new(); n];
    for (from, state) in a.states.iter().enumerate() {
        for t in &state.transitions {
            incoming[t.dest].push(from);
        }
    }
    let mut live = vec![false; n];
    let mut stack: Vec<StateId> = (0..n).filter(|&s| a.states[s].accept).collect();
    for &s in &stack {
        live[s] = true;
    }
    while let Some(state) = stack.pop() {
        for &from in &incoming[state] {
            if !live[from] {
                live[from] = true;
                stack.push(from);
            }
        }
    }

    if !live[INITIAL_STATE] {
        return Automaton::empty();
    }

    let mut remap: Vec<Option<StateId>> = vec![None; n];
    let mut next_id = 0;
    for state in 0..n {
        if reachable[state] && live[state] {
            remap[state] = Some(next_id);
            next_id += 1;
        }
    }

    let states = a
        .states
        .iter()
        .enumerate()
        .filter(|(id, _)| remap[*id].is_some())
        .map(|(_, state)| State {
            accept: state.accept,
            transitions: state
                .transitions
                .iter()
                .filter_map(|t| {
                    remap[t.dest].map(|dest| Transition {
                        min: t.min,
                        max: t.max,
                        dest,
                    })
                })
                .collect(),
        })
        .collect();

    Automaton {
        states,
        deterministic: a.deterministic,
    }
}

/// Offsets a transition's destination by `offset` states.
fn shift(t: Transition, offset: usize) -> Transition {
    Transition {
        dest: t.dest + offset,
        ..t
    }
}
