//! Joint traversal of a byte automaton and the suggestion FST.

use std::collections::VecDeque;

use fz_automaton::{Automaton, INITIAL_STATE, StateId};

use crate::index::SuggestFst;

/// A walk from the FST root along an accepted prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FstPath {
    /// Address of the FST node reached.
    pub addr: usize,
    /// Output accumulated along the walk.
    pub output: u64,
    /// Bytes consumed from the root.
    pub input: Vec<u8>,
}

/// Returns every FST walk whose input is accepted by `a`.
///
/// `a` is over bytes. A walk is reported as soon as the automaton accepts and is not
/// extended further: every key below the reported node shares the accepted prefix.
pub fn intersect_prefix_paths(a: &Automaton, fst: &SuggestFst) -> Vec<FstPath> {
    let mut results = Vec::new();
    let mut queue: VecDeque<(StateId, FstPath)> = VecDeque::new();
    queue.push_back((
        INITIAL_STATE,
        FstPath {
            addr: fst.root().addr(),
            output: 0,
            input: Vec::new(),
        },
    ));

    while let Some((state, path)) = queue.pop_front() {
        if a.is_accept(state) {
            results.push(path);
            continue;
        }

        let node = fst.node(path.addr);
        for t in a.transitions(state) {
            for arc in node.transitions() {
                if !t.contains(u32::from(arc.inp)) {
                    continue;
                }
                let mut input = path.input.clone();
                input.push(arc.inp);
                queue.push_back((
                    t.dest,
                    FstPath {
                        addr: arc.addr,
                        output: path.output + arc.out.value(),
                        input,
                    },
                ));
            }
        }
    }

    results
}
