//! The FST holding analyzed forms, surface forms and weights.
//!
//! Each key is `analyzed form ++ END_BYTE ++ surface form`; the value is the cost
//! `u32::MAX - weight`, so cheaper keys are better suggestions.

use std::{collections::BTreeMap, sync::Arc};

use fz_automaton::{Automaton, INITIAL_STATE, StateId};
use tantivy_fst::{IntoStreamer, Map, MapBuilder, Streamer, raw::Fst};

use crate::{SuggestError, tokens::END_BYTE};

/// Raw FST type the prefix matcher walks.
pub type SuggestFst = Fst<Arc<[u8]>>;

/// Converts a weight into the cost stored in the FST.
pub fn weight_to_cost(weight: u32) -> u64 {
    u64::from(u32::MAX - weight)
}

/// Converts a stored cost back into a weight.
pub fn cost_to_weight(cost: u64) -> u32 {
    let cost = u32::try_from(cost).unwrap_or(u32::MAX);
    u32::MAX - cost
}

/// Immutable suggestion index.
pub struct SuggestIndex {
    /// Serialized FST, shared with `map`.
    bytes: Arc<[u8]>,
    /// Map view over the serialized FST.
    map: Map<Arc<[u8]>>,
}

impl SuggestIndex {
    /// Builds an index from sorted, unique keys and their costs.
    pub fn from_sorted(keys: &BTreeMap<Vec<u8>, u64>) -> Result<Self, SuggestError> {
        let mut builder = MapBuilder::memory();
        for (key, &cost) in keys {
            builder
                .insert(key, cost)
                .map_err(|e| SuggestError::fst(&e))?;
        }
        let bytes = builder.into_inner().map_err(|e| SuggestError::fst(&e))?;
        Self::from_bytes(bytes)
    }

    /// Loads an index from serialized FST bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SuggestError> {
        let bytes: Arc<[u8]> = Arc::from(bytes);
        let fst = Fst::new(Arc::clone(&bytes)).map_err(|e| SuggestError::fst(&e))?;
        Ok(Self {
            bytes,
            map: Map::from(fst),
        })
    }

    /// Serialized FST bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raw FST for node-level traversal.
    pub fn fst(&self) -> &SuggestFst {
        self.map.as_fst()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the index has no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cost stored for an exact key.
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        self.map.get(key)
    }

    /// Returns up to `limit` keys having a prefix accepted by the byte automaton `a`, in key
    /// order.
    pub fn keys_with_accepted_prefix(&self, a: &Automaton, limit: usize) -> Vec<Vec<u8>> {
        let mut stream = self.map.search(PrefixAutomaton(a)).into_stream();
        let mut keys = Vec::new();
        while keys.len() < limit
            && let Some((key, _)) = stream.next()
        {
            keys.push(key.to_vec());
        }
        keys
    }
}

/// Splits an index key into its analyzed and surface parts.
pub fn split_key(key: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = key.iter().position(|&b| b == END_BYTE)?;
    Some((&key[..pos], &key[pos + 1..]))
}

/// Walk state of [`PrefixAutomaton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrefixState {
    /// Inside the automaton, no accepting state reached yet.
    Live(StateId),
    /// An accepted prefix has been read; everything after it matches.
    Matched,
    /// No transition for the input read so far.
    Dead,
}

/// Adapts a deterministic byte [`Automaton`] to `tantivy_fst::Automaton`, matching every key
/// that starts with an accepted sequence.
struct PrefixAutomaton<'a>(&'a Automaton);

impl PrefixAutomaton<'_> {
    /// Enters `state`, collapsing accepting states into `Matched`.
    fn enter(&self, state: StateId) -> PrefixState {
        if self.0.is_accept(state) {
            PrefixState::Matched
        } else {
            PrefixState::Live(state)
        }
    }
}

impl tantivy_fst::Automaton for PrefixAutomaton<'_> {
    type State = PrefixState;

    fn start(&self) -> Self::State {
        self.enter(INITIAL_STATE)
    }

    fn is_match(&self, state: &Self::State) -> bool {
        *state == PrefixState::Matched
    }

    fn can_match(&self, state: &Self::State) -> bool {
        *state != PrefixState::Dead
    }

    fn will_always_match(&self, state: &Self::State) -> bool {
        *state == PrefixState::Matched
    }

    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        match *state {
            PrefixState::Live(s) => self
                .0
                .step(s, u32::from(byte))
                .map_or(PrefixState::Dead, |next| self.enter(next)),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(keys: &[(&str, u32)]) -> SuggestIndex {
        let map: BTreeMap<Vec<u8>, u64> = keys
            .iter()
            .map(|(k, w)| (k.as_bytes().to_vec(), weight_to_cost(*w)))
            .collect();
        SuggestIndex::from_sorted(&map).unwrap()
    }

    #[test]
    fn cost_round_trip_orders_by_weight() {
        assert!(weight_to_cost(10) < weight_to_cost(5));
        assert_eq!(cost_to_weight(weight_to_cost(42)), 42);
        assert_eq!(cost_to_weight(weight_to_cost(0)), 0);
    }

    #[test]
    fn builds_and_reads_back() {
        let idx = index(&[("cat\0Cat", 3), ("dog\0Dog", 7)]);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.get(b"dog\0Dog"), Some(weight_to_cost(7)));
        assert_eq!(idx.get(b"dog"), None);

        let copy = SuggestIndex::from_bytes(idx.as_bytes().to_vec()).unwrap();
        assert_eq!(copy.get(b"cat\0Cat"), Some(weight_to_cost(3)));
    }

    #[test]
    fn empty_index() {
        let idx = SuggestIndex::from_sorted(&BTreeMap::new()).unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn garbage_bytes_rejected() {
        assert!(matches!(
            SuggestIndex::from_bytes(vec![1, 2, 3]),
            Err(SuggestError::Fst(_))
        ));
    }

    #[test]
    fn split_key_parts() {
        assert_eq!(
            split_key(b"cat\0The Cat"),
            Some((&b"cat"[..], &b"The Cat"[..]))
        );
        assert_eq!(split_key(b"nokey"), None);
    }

    #[test]
    fn prefix_search_matches_extensions() {
        let idx = index(&[("ca\0Ca", 1), ("cat\0Cat", 1), ("cot\0Cot", 1), ("dog\0Dog", 1)]);
        let keys = idx.keys_with_accepted_prefix(&Automaton::from_bytes(b"ca"), 10);
        assert_eq!(keys, vec![b"ca\0Ca".to_vec(), b"cat\0Cat".to_vec()]);

        let limited = idx.keys_with_accepted_prefix(&Automaton::from_bytes(b"c"), 2);
        assert_eq!(limited.len(), 2);
    }
}
