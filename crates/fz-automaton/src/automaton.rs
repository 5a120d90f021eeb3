//! The automaton value type and its builder.

use std::{fmt, mem};

/// Identifier of a state inside an [`Automaton`].
pub type StateId = usize;

/// The initial state of every automaton.
pub const INITIAL_STATE: StateId = 0;

/// A labelled edge covering the inclusive symbol range `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    /// Smallest symbol accepted by this edge.
    pub min: u32,
    /// Largest symbol accepted by this edge.
    pub max: u32,
    /// Destination state.
    pub dest: StateId,
}

impl Transition {
    /// Returns true if `symbol` falls inside this edge's range.
    pub fn contains(&self, symbol: u32) -> bool {
        self.min <= symbol && symbol <= self.max
    }
}

/// A single state: its accept flag and outgoing edges sorted by `min`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// Whether the state is accepting.
    pub accept: bool,
    /// Outgoing edges.
    pub transitions: Vec<Transition>,
}

/// An epsilon-free finite acceptor over `u32` symbols.
///
/// Symbols are bytes or Unicode code points depending on the caller. State
/// [`INITIAL_STATE`] is always present and is the start state. Automata are
/// immutable once built; use [`Builder`] to construct new ones.
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton {
    /// All states, indexed by [`StateId`].
    pub(crate) states: Vec<State>,
    /// Whether the automaton is known to be deterministic.
    pub(crate) deterministic: bool,
}

impl Automaton {
    /// Returns an automaton that accepts nothing.
    pub fn empty() -> Self {
        Self {
            states: vec![State::default()],
            deterministic: true,
        }
    }

    /// Returns an automaton that accepts only the empty sequence.
    pub fn empty_string() -> Self {
        Self {
            states: vec![State {
                accept: true,
                transitions: Vec::new(),
            }],
            deterministic: true,
        }
    }

    /// Returns an automaton accepting exactly `symbols`.
    pub fn from_symbols(symbols: &[u32]) -> Self {
        let mut states = Vec::with_capacity(symbols.len() + 1);
        for (i, &symbol) in symbols.iter().enumerate() {
            states.push(State {
                accept: false,
                transitions: vec![Transition {
                    min: symbol,
                    max: symbol,
                    dest: i + 1,
                }],
            });
        }
        states.push(State {
            accept: true,
            transitions: Vec::new(),
        });
        Self {
            states,
            deterministic: true,
        }
    }

    /// Returns an automaton accepting exactly the bytes of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let symbols: Vec<u32> = bytes.iter().map(|&b| u32::from(b)).collect();
        Self::from_symbols(&symbols)
    }

    /// Returns an automaton accepting exactly the code points of `text`.
    pub fn from_chars(text: &str) -> Self {
        let symbols: Vec<u32> = text.chars().map(u32::from).collect();
        Self::from_symbols(&symbols)
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Total number of transitions across all states.
    pub fn num_transitions(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// Returns true if `state` is accepting.
    pub fn is_accept(&self, state: StateId) -> bool {
        self.states[state].accept
    }

    /// Outgoing transitions of `state`, sorted by range start.
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        &self.states[state].transitions
    }

    /// Whether this automaton carries the deterministic flag.
    ///
    /// The flag is set by construction for exact-string automata, by
    /// [`determinize`](crate::determinize) and by [`Self::assume_deterministic`].
    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Flags this automaton as deterministic without running subset construction.
    ///
    /// Callers must only use this when determinism holds by construction. Debug
    /// builds verify the claim.
    pub fn assume_deterministic(mut self) -> Self {
        debug_assert!(
            self.check_deterministic(),
            "automaton flagged deterministic has overlapping transitions"
        );
        self.deterministic = true;
        self
    }

    /// Structurally verifies that no state has two transitions sharing a symbol.
    pub fn check_deterministic(&self) -> bool {
        self.states.iter().all(|state| {
            let mut ranges: Vec<(u32, u32)> =
                state.transitions.iter().map(|t| (t.min, t.max)).collect();
            ranges.sort_unstable();
            ranges.windows(2).all(|w| w[0].1 < w[1].0)
        })
    }

    /// Follows the first transition of `state` covering `symbol`.
    ///
    /// Only meaningful on deterministic automata.
    pub fn step(&self, state: StateId, symbol: u32) -> Option<StateId> {
        self.states[state]
            .transitions
            .iter()
            .find(|t| t.contains(symbol))
            .map(|t| t.dest)
    }

    /// Returns true if the automaton accepts `symbols`.
    ///
    /// Simulates all active states at once, so it works for nondeterministic
    /// automata too.
    pub fn run(&self, symbols: &[u32]) -> bool {
        let mut active = vec![INITIAL_STATE];
        let mut next = Vec::new();
        for &symbol in symbols {
            next.clear();
            for &state in &active {
                next.extend(
                    self.states[state]
                        .transitions
                        .iter()
                        .filter(|t| t.contains(symbol))
                        .map(|t| t.dest),
                );
            }
            next.sort_unstable();
            next.dedup();
            if next.is_empty() {
                return false;
            }
            mem::swap(&mut active, &mut next);
        }
        active.iter().any(|&s| self.states[s].accept)
    }

    /// Returns true if the automaton accepts `bytes`.
    pub fn run_bytes(&self, bytes: &[u8]) -> bool {
        let symbols: Vec<u32> = bytes.iter().map(|&b| u32::from(b)).collect();
        self.run(&symbols)
    }

    /// Returns true if the automaton accepts the code points of `text`.
    pub fn run_chars(&self, text: &str) -> bool {
        let symbols: Vec<u32> = text.chars().map(u32::from).collect();
        self.run(&symbols)
    }

    /// Returns true if no accepting state is reachable from the initial state.
    pub fn accepts_nothing(&self) -> bool {
        let mut seen = vec![false; self.states.len()];
        let mut stack = vec![INITIAL_STATE];
        seen[INITIAL_STATE] = true;
        while let Some(state) = stack.pop() {
            if self.states[state].accept {
                return false;
            }
            for t in &self.states[state].transitions {
                if !seen[t.dest] {
                    seen[t.dest] = true;
                    stack.push(t.dest);
                }
            }
        }
        true
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Automaton ({} states, deterministic={})",
            self.states.len(),
            self.deterministic
        )?;
        for (id, state) in self.states.iter().enumerate() {
            let marker = if state.accept { "*" } else { " " };
            write!(f, "  {marker}{id}:")?;
            for t in &state.transitions {
                if t.min == t.max {
                    write!(f, " {:#x}->{}", t.min, t.dest)?;
                } else {
                    write!(f, " [{:#x}-{:#x}]->{}", t.min, t.max, t.dest)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Incremental constructor for [`Automaton`] values.
///
/// The first state created is the initial state.
#[derive(Debug, Default)]
pub struct Builder {
    /// States created so far.
    states: Vec<State>,
}

impl Builder {
    /// Creates a builder with no states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new non-accepting state and returns its id.
    pub fn create_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    /// Sets the accept flag of `state`.
    pub fn set_accept(&mut self, state: StateId, accept: bool) {
        self.states[state].accept = accept;
    }

    /// Adds an edge from `from` to `to` covering the single `symbol`.
    pub fn add_transition(&mut self, from: StateId, to: StateId, symbol: u32) {
        self.add_range(from, to, symbol, symbol);
    }

    /// Adds an edge from `from` to `to` covering `min..=max`.
    pub fn add_range(&mut self, from: StateId, to: StateId, min: u32, max: u32) {
        debug_assert!(min <= max, "empty transition range {min}..={max}");
        self.states[from].transitions.push(Transition { min, max, dest: to });
    }

    /// Number of states created so far.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Finishes construction.
    ///
    /// Transitions are sorted and exact duplicates removed. A builder with no
    /// states yields [`Automaton::empty`].
    pub fn finish(mut self) -> Automaton {
        if self.states.is_empty() {
            return Automaton::empty();
        }
        for state in &mut self.states {
            state.transitions.sort_unstable();
            state.transitions.dedup();
        }
        Automaton {
            states: self.states,
            deterministic: false,
        }
    }
}
