//! Best-first completion search over the suggestion FST.

use std::collections::BTreeSet;

use crate::{index::SuggestFst, paths::FstPath};

/// A complete FST key and its cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Full key bytes.
    pub key: Vec<u8>,
    /// Total cost of the key.
    pub cost: u64,
}

/// Frontier entry, ordered by cost then input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Frontier {
    /// Cost so far; for complete entries the key's total cost.
    cost: u64,
    /// Bytes read from the root.
    input: Vec<u8>,
    /// Whether `input` is a full key.
    complete: bool,
    /// FST node reached.
    addr: usize,
}

/// Yields the cheapest keys below a set of start paths.
///
/// FST outputs only grow along a walk, so popping the cheapest frontier entry first
/// returns complete keys in increasing cost order. Outputs are also pushed toward the
/// root, so an entry's cost is the cost of its cheapest key below it.
pub struct TopNSearcher<'a> {
    /// Index being searched.
    fst: &'a SuggestFst,
    /// Pending entries, cheapest first.
    queue: BTreeSet<Frontier>,
    /// Most entries kept in `queue`; the most expensive are dropped beyond it.
    max_queue: Option<usize>,
}

impl<'a> TopNSearcher<'a> {
    /// Creates an unbounded searcher with no start paths.
    pub fn new(fst: &'a SuggestFst) -> Self {
        Self {
            fst,
            queue: BTreeSet::new(),
            max_queue: None,
        }
    }

    /// Keeps at most `max_queue` pending entries.
    ///
    /// Each pending entry leads to at least one distinct key no cheaper than it, so
    /// the cap loses results only when `accept` rejects more than `max_queue - limit`
    /// keys ahead of the last one returned.
    #[must_use]
    pub fn with_max_queue(mut self, max_queue: usize) -> Self {
        self.max_queue = Some(max_queue.max(1));
        self
    }

    /// Adds a start path.
    pub fn add_start(&mut self, path: &FstPath) {
        self.push(Frontier {
            cost: path.output,
            input: path.input.clone(),
            complete: false,
            addr: path.addr,
        });
    }

    /// Number of pending entries.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Queues `entry`, then drops the most expensive entries over the cap.
    fn push(&mut self, entry: Frontier) {
        self.queue.insert(entry);
        if let Some(max) = self.max_queue {
            while self.queue.len() > max {
                self.queue.pop_last();
            }
        }
    }

    /// Returns up to `limit` keys in increasing cost order, skipping keys `accept` rejects.
    pub fn search(mut self, limit: usize, mut accept: impl FnMut(&[u8]) -> bool) -> Vec<Completion> {
        let mut results = Vec::new();
        if limit == 0 {
            return results;
        }

        let fst = self.fst;
        while let Some(entry) = self.queue.pop_first() {
            if entry.complete {
                if accept(&entry.input) {
                    results.push(Completion {
                        key: entry.input,
                        cost: entry.cost,
                    });
                    if results.len() >= limit {
                        break;
                    }
                }
                continue;
            }

            let node = fst.node(entry.addr);
            for arc in node.transitions() {
                let mut input = Vec::with_capacity(entry.input.len() + 1);
                input.extend_from_slice(&entry.input);
                input.push(arc.inp);
                self.push(Frontier {
                    cost: entry.cost + arc.out.value(),
                    input,
                    complete: false,
                    addr: arc.addr,
                });
            }
            if node.is_final() {
                self.push(Frontier {
                    cost: entry.cost + node.final_output().value(),
                    input: entry.input,
                    complete: true,
                    addr: entry.addr,
                });
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, str};

    use fz_automaton::Automaton;

    use super::*;
    use crate::{index::SuggestIndex, paths::intersect_prefix_paths};

    fn index(keys: &[(&str, u64)]) -> SuggestIndex {
        let map: BTreeMap<Vec<u8>, u64> = keys
            .iter()
            .map(|(k, c)| (k.as_bytes().to_vec(), *c))
            .collect();
        SuggestIndex::from_sorted(&map).unwrap()
    }

    fn keys(completions: &[Completion]) -> Vec<&str> {
        completions
            .iter()
            .map(|c| str::from_utf8(&c.key).unwrap())
            .collect()
    }

    fn search(idx: &SuggestIndex, prefix: &[u8], limit: usize) -> Vec<Completion> {
        let mut searcher = TopNSearcher::new(idx.fst());
        for path in intersect_prefix_paths(&Automaton::from_bytes(prefix), idx.fst()) {
            searcher.add_start(&path);
        }
        searcher.search(limit, |_| true)
    }

    #[test]
    fn returns_cheapest_first() {
        let idx = index(&[("cab", 30), ("car", 10), ("cat", 20), ("dog", 0)]);
        let results = search(&idx, b"ca", 10);
        assert_eq!(keys(&results), vec!["car", "cat", "cab"]);
        assert_eq!(results[0].cost, 10);
    }

    #[test]
    fn respects_limit() {
        let idx = index(&[("cab", 30), ("car", 10), ("cat", 20)]);
        assert_eq!(keys(&search(&idx, b"c", 2)), vec!["car", "cat"]);
        assert!(search(&idx, b"c", 0).is_empty());
    }

    #[test]
    fn ties_break_by_key() {
        let idx = index(&[("b", 5), ("a", 5), ("c", 5)]);
        assert_eq!(keys(&search(&idx, b"", 3)), vec!["a", "b", "c"]);
    }

    #[test]
    fn filter_skips_rejected_keys() {
        let idx = index(&[("car", 10), ("cat", 20), ("cab", 30)]);
        let mut searcher = TopNSearcher::new(idx.fst());
        for path in intersect_prefix_paths(&Automaton::from_bytes(b"ca"), idx.fst()) {
            searcher.add_start(&path);
        }
        let results = searcher.search(2, |key| key != b"car");
        assert_eq!(keys(&results), vec!["cat", "cab"]);
    }

    #[test]
    fn key_that_is_prefix_of_another() {
        let idx = index(&[("ca", 50), ("cat", 1)]);
        assert_eq!(keys(&search(&idx, b"c", 5)), vec!["cat", "ca"]);
    }

    #[test]
    fn capped_queue_still_finds_cheapest_keys() {
        // Two hundred keys below "k", plus a cheap key on a separate branch.
        let mut keys_and_costs: Vec<(String, u64)> =
            (0..200).map(|i| (format!("k{i:03}"), 100 + i)).collect();
        keys_and_costs.push(("zz".to_string(), 5));
        let refs: Vec<(&str, u64)> = keys_and_costs.iter().map(|(k, c)| (k.as_str(), *c)).collect();
        let idx = index(&refs);

        let mut searcher = TopNSearcher::new(idx.fst()).with_max_queue(8);
        for path in intersect_prefix_paths(&Automaton::from_bytes(b""), idx.fst()) {
            searcher.add_start(&path);
        }
        let results = searcher.search(3, |_| true);
        assert_eq!(keys(&results), vec!["zz", "k000", "k001"]);
    }

    #[test]
    fn queue_never_exceeds_cap() {
        let owned: Vec<(String, u64)> = (0..50).map(|i| (format!("a{i:02}"), 49 - i)).collect();
        let refs: Vec<(&str, u64)> = owned.iter().map(|(k, c)| (k.as_str(), *c)).collect();
        let idx = index(&refs);

        let mut searcher = TopNSearcher::new(idx.fst()).with_max_queue(4);
        for (key, _) in &refs {
            for path in intersect_prefix_paths(&Automaton::from_bytes(key.as_bytes()), idx.fst()) {
                searcher.add_start(&path);
            }
        }
        assert_eq!(searcher.queue_len(), 4);
        let results = searcher.search(2, |_| true);
        assert_eq!(keys(&results), vec!["a49", "a48"]);
    }
}
