//! The analyzing suggester.
//!
//! Entries are analyzed into token graphs, every path through the graph becomes an
//! analyzed form, and `analyzed form ++ END_BYTE ++ surface form` is written to the FST.
//! Lookups analyze the key the same way, walk the FST along the resulting automaton and
//! complete the cheapest keys below the matched prefixes. A [`MatchStrategy`] can replace
//! the automaton used for matching, which is how fuzzy matching plugs in.

mod store;

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::Path,
};

use fz_automaton::{Automaton, determinize, finite_strings};
use fz_config::SuggestSettings;
use serde::Serialize;
use tracing::{debug, trace};

pub use self::store::{FORMAT_VERSION, Manifest, settings_hash};
use crate::{
    SuggestError,
    analyzer::{AnalyzedToken, Analyzer},
    index::{SuggestIndex, cost_to_weight, split_key, weight_to_cost},
    paths::{FstPath, intersect_prefix_paths},
    strategy::{ExactMatch, MatchStrategy},
    tokens::{END_BYTE, TokenStreamToAutomaton},
    topn::{Completion, TopNSearcher},
};

/// Default cap on surface forms kept per analyzed form.
pub const DEFAULT_MAX_SURFACE_FORMS: usize = 256;

/// Smallest frontier a lookup search keeps.
const MIN_QUEUE_DEPTH: usize = 1024;

/// Options of the base suggester.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuggesterOptions {
    /// Return an entry whose surface form equals the key before all others.
    pub exact_first: bool,
    /// Keep token boundaries significant.
    pub preserve_sep: bool,
    /// Count positions left empty by removed tokens.
    pub preserve_position_increments: bool,
    /// Surface forms kept per analyzed form, highest weights first.
    pub max_surface_forms_per_analyzed_form: usize,
    /// Analyzed forms indexed per entry; `None` indexes all of them.
    pub max_graph_expansions: Option<usize>,
}

impl Default for SuggesterOptions {
    fn default() -> Self {
        Self {
            exact_first: true,
            preserve_sep: true,
            preserve_position_increments: true,
            max_surface_forms_per_analyzed_form: DEFAULT_MAX_SURFACE_FORMS,
            max_graph_expansions: None,
        }
    }
}

impl SuggesterOptions {
    /// Extracts suggester options from loaded settings.
    pub fn from_settings(settings: &SuggestSettings) -> Self {
        Self {
            exact_first: settings.exact_first,
            preserve_sep: settings.preserve_sep,
            preserve_position_increments: settings.preserve_position_increments,
            max_surface_forms_per_analyzed_form: settings.max_surface_forms,
            max_graph_expansions: settings.max_graph_expansions,
        }
    }

    /// Byte-labelled converter for these options.
    pub fn base_converter(&self) -> TokenStreamToAutomaton {
        TokenStreamToAutomaton::new(self.preserve_sep, self.preserve_position_increments)
    }
}

/// A suggestion source with its weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestEntry {
    /// Text returned to the user.
    pub surface: String,
    /// Higher weights rank first.
    pub weight: u32,
}

impl SuggestEntry {
    /// Creates an entry.
    pub fn new(surface: impl Into<String>, weight: u32) -> Self {
        Self {
            surface: surface.into(),
            weight,
        }
    }
}

/// A lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Surface form of the matching entry.
    pub key: String,
    /// Weight of the matching entry.
    pub weight: u32,
}

/// Automaton statistics for one lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    /// Tokens the key analyzed to.
    pub tokens: Vec<String>,
    /// Paths through the lookup automaton.
    pub lookup_paths: usize,
    /// States of the lookup automaton.
    pub lookup_states: usize,
    /// States of the match automaton after conversion to bytes.
    pub match_states: usize,
    /// Transitions of the match automaton after conversion to bytes.
    pub match_transitions: usize,
    /// Whether the match automaton is flagged deterministic.
    pub deterministic: bool,
    /// FST prefixes the match automaton reaches.
    pub prefix_paths: usize,
}

/// FST-backed suggester, parameterized by its match strategy.
pub struct Suggester<S: MatchStrategy = ExactMatch> {
    /// Analyzer shared by build and lookup.
    analyzer: Analyzer,
    /// Base suggester options.
    options: SuggesterOptions,
    /// Matching hooks.
    strategy: S,
    /// Suggestion FST.
    index: SuggestIndex,
    /// Number of entries the index was built from.
    entry_count: usize,
}

impl<S: MatchStrategy> Suggester<S> {
    /// Builds a suggester over `entries`.
    ///
    /// Entries whose analysis yields no tokens are skipped.
    pub fn build(
        analyzer: Analyzer,
        options: SuggesterOptions,
        strategy: S,
        entries: &[SuggestEntry],
    ) -> Result<Self, SuggestError> {
        let converter = strategy.token_converter(options.base_converter());
        let mut forms: HashMap<Vec<u8>, Vec<&SuggestEntry>> = HashMap::new();
        let mut indexed = 0;

        for entry in entries {
            let tokens = analyzer.analyze(&entry.surface);
            if tokens.is_empty() {
                debug!(surface = %entry.surface, "entry analyzed to nothing, skipping");
                continue;
            }
            indexed += 1;
            let automaton =
                determinize(&strategy.convert_automaton(converter.to_automaton(&tokens)));
            for path in finite_strings(&automaton, options.max_graph_expansions) {
                if let Some(analyzed) = symbols_to_bytes(&path) {
                    forms.entry(analyzed).or_default().push(entry);
                }
            }
        }

        let mut keys: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
        for (analyzed, mut candidates) in forms {
            candidates.sort_by(|a, b| {
                a.surface
                    .cmp(&b.surface)
                    .then_with(|| b.weight.cmp(&a.weight))
            });
            candidates.dedup_by(|a, b| a.surface == b.surface);
            candidates.sort_by(|a, b| {
                b.weight
                    .cmp(&a.weight)
                    .then_with(|| a.surface.cmp(&b.surface))
            });
            candidates.truncate(options.max_surface_forms_per_analyzed_form);

            for entry in candidates {
                let mut key = Vec::with_capacity(analyzed.len() + 1 + entry.surface.len());
                key.extend_from_slice(&analyzed);
                key.push(END_BYTE);
                key.extend_from_slice(entry.surface.as_bytes());
                keys.insert(key, weight_to_cost(entry.weight));
            }
        }

        let index = SuggestIndex::from_sorted(&keys)?;
        debug!(entries = indexed, keys = index.len(), "built suggester");
        Ok(Self {
            analyzer,
            options,
            strategy,
            index,
            entry_count: indexed,
        })
    }

    /// Returns up to `num` suggestions for `key`, best first.
    pub fn lookup(&self, key: &str, num: usize) -> Result<Vec<Suggestion>, SuggestError> {
        if num == 0 {
            return Ok(Vec::new());
        }
        let Some(lookup) = self.lookup_automaton(key) else {
            return Ok(Vec::new());
        };

        let fst = self.index.fst();
        let converted = self.strategy.convert_automaton(lookup.clone());
        let prefix_paths = intersect_prefix_paths(&converted, fst);
        trace!(key, prefix_paths = prefix_paths.len(), "exact prefixes matched");

        let mut results = Vec::new();
        let mut seen: HashSet<Vec<u8>> = HashSet::new();
        if self.options.exact_first
            && let Some(exact) = self.exact_match(key, &prefix_paths)
        {
            seen.insert(exact.key.as_bytes().to_vec());
            results.push(exact);
            if results.len() == num {
                return Ok(results);
            }
        }

        let paths = self.strategy.full_prefix_paths(prefix_paths, &lookup, fst)?;
        let remaining = num - results.len();
        let mut searcher = TopNSearcher::new(fst).with_max_queue(self.queue_depth(remaining));
        for path in &paths {
            searcher.add_start(path);
        }
        let completions = searcher.search(remaining, |candidate| {
            split_key(candidate).is_some_and(|(_, surface)| seen.insert(surface.to_vec()))
        });
        results.extend(completions.iter().filter_map(to_suggestion));

        debug!(key, paths = paths.len(), results = results.len(), "lookup");
        Ok(results)
    }

    /// Reports how `key` is turned into automata, without completing it.
    pub fn explain(&self, key: &str) -> Result<Explanation, SuggestError> {
        let tokens: Vec<String> = self.analyzer.analyze(key).into_iter().map(|t| t.text).collect();
        let lookup = self.lookup_automaton(key).unwrap_or_else(Automaton::empty);
        let matcher = self
            .strategy
            .convert_automaton(self.strategy.build_match_automaton(&lookup)?);
        let prefix_paths = intersect_prefix_paths(&matcher, self.index.fst()).len();

        Ok(Explanation {
            tokens,
            lookup_paths: finite_strings(&lookup, None).len(),
            lookup_states: lookup.num_states(),
            match_states: matcher.num_states(),
            match_transitions: matcher.num_transitions(),
            deterministic: matcher.is_deterministic(),
            prefix_paths,
        })
    }

    /// Writes the index into `dir`.
    pub fn save(&self, dir: &Path) -> Result<(), SuggestError> {
        let manifest = Manifest {
            format_version: FORMAT_VERSION,
            settings_hash: self.settings_hash(),
            entry_count: self.entry_count,
        };
        store::write_index(dir, self.index.as_bytes(), &manifest)?;
        debug!(dir = %dir.display(), keys = self.index.len(), "saved suggester");
        Ok(())
    }

    /// Opens an index saved by [`Self::save`].
    ///
    /// `analyzer` and `options` must shape keys the way the saved ones did; otherwise this
    /// fails with [`SuggestError::SettingsMismatch`]. The strategy is free to differ, since
    /// every strategy reads the same byte keys.
    pub fn open(
        dir: &Path,
        analyzer: Analyzer,
        options: SuggesterOptions,
        strategy: S,
    ) -> Result<Self, SuggestError> {
        let expected = settings_hash(analyzer.settings(), &options);
        let (manifest, bytes) = store::read_index(dir, &expected)?;
        let index = SuggestIndex::from_bytes(bytes)?;
        debug!(dir = %dir.display(), keys = index.len(), "opened suggester");
        Ok(Self {
            analyzer,
            options,
            strategy,
            index,
            entry_count: manifest.entry_count,
        })
    }

    /// Hash of the settings that shape this suggester's keys.
    pub fn settings_hash(&self) -> String {
        settings_hash(self.analyzer.settings(), &self.options)
    }

    /// Analyzer used by this suggester.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Base suggester options.
    pub fn options(&self) -> &SuggesterOptions {
        &self.options
    }

    /// Matching hooks.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Number of entries indexed.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Number of keys in the FST.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Converter actually used, after strategy adjustment.
    fn converter(&self) -> TokenStreamToAutomaton {
        self.strategy.token_converter(self.options.base_converter())
    }

    /// Deterministic automaton for `key` in the converter's alphabet, or `None` if the
    /// key analyzes to nothing.
    fn lookup_automaton(&self, key: &str) -> Option<Automaton> {
        let tokens: Vec<AnalyzedToken> = self.analyzer.analyze(key);
        if tokens.is_empty() {
            return None;
        }
        Some(determinize(&self.converter().to_automaton(&tokens)))
    }

    /// Frontier size for a search wanting `remaining` results.
    ///
    /// Duplicate surfaces are the keys the search rejects, so the margin scales with
    /// the surface forms kept per analyzed form.
    fn queue_depth(&self, remaining: usize) -> usize {
        remaining
            .saturating_mul(self.options.max_surface_forms_per_analyzed_form.max(1))
            .max(MIN_QUEUE_DEPTH)
    }

    /// Finds the entry whose analyzed form equals the key's and whose surface is `key`.
    fn exact_match(&self, key: &str, prefix_paths: &[FstPath]) -> Option<Suggestion> {
        let fst = self.index.fst();
        let mut searcher = TopNSearcher::new(fst);
        for path in prefix_paths {
            let node = fst.node(path.addr);
            if let Some(arc) = node.transitions().find(|arc| arc.inp == END_BYTE) {
                let mut input = path.input.clone();
                input.push(END_BYTE);
                searcher.add_start(&FstPath {
                    addr: arc.addr,
                    output: path.output + arc.out.value(),
                    input,
                });
            }
        }
        let hit = searcher.search(1, |candidate| {
            split_key(candidate).is_some_and(|(_, surface)| surface == key.as_bytes())
        });
        hit.first().and_then(to_suggestion)
    }
}

/// Maps a completed FST key to a suggestion.
fn to_suggestion(completion: &Completion) -> Option<Suggestion> {
    let (_, surface) = split_key(&completion.key)?;
    Some(Suggestion {
        key: String::from_utf8_lossy(surface).into_owned(),
        weight: cost_to_weight(completion.cost),
    })
}

/// Narrows byte-alphabet symbols to bytes.
fn symbols_to_bytes(symbols: &[u32]) -> Option<Vec<u8>> {
    symbols.iter().map(|&s| u8::try_from(s).ok()).collect()
}

#[cfg(test)]
mod tests {
    use fz_config::AnalysisSettings;

    use super::*;

    fn suggester(entries: &[(&str, u32)]) -> Suggester {
        let analyzer = Analyzer::from_settings(&AnalysisSettings::default()).unwrap();
        let entries: Vec<SuggestEntry> = entries
            .iter()
            .map(|(s, w)| SuggestEntry::new(*s, *w))
            .collect();
        Suggester::build(analyzer, SuggesterOptions::default(), ExactMatch, &entries).unwrap()
    }

    fn keys(results: &[Suggestion]) -> Vec<&str> {
        results.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn prefix_completion_by_weight() {
        let s = suggester(&[("cat", 5), ("car", 10), ("cab", 1), ("dog", 100)]);
        let results = s.lookup("ca", 10).unwrap();
        assert_eq!(keys(&results), vec!["car", "cat", "cab"]);
        assert_eq!(results[0].weight, 10);
    }

    #[test]
    fn exact_first_promotes_exact_surface() {
        let s = suggester(&[("cat", 1), ("catalog", 50), ("category", 20)]);
        assert_eq!(keys(&s.lookup("cat", 2).unwrap()), vec!["cat", "catalog"]);

        let analyzer = Analyzer::from_settings(&AnalysisSettings::default()).unwrap();
        let options = SuggesterOptions {
            exact_first: false,
            ..Default::default()
        };
        let entries = [
            SuggestEntry::new("cat", 1),
            SuggestEntry::new("catalog", 50),
            SuggestEntry::new("category", 20),
        ];
        let plain = Suggester::build(analyzer, options, ExactMatch, &entries).unwrap();
        assert_eq!(keys(&plain.lookup("cat", 2).unwrap()), vec!["catalog", "category"]);
    }

    #[test]
    fn exact_hit_is_not_repeated() {
        let s = suggester(&[("cat", 1), ("cats", 2)]);
        assert_eq!(keys(&s.lookup("cat", 5).unwrap()), vec!["cat", "cats"]);
    }

    #[test]
    fn zero_limit_and_empty_key() {
        let s = suggester(&[("cat", 1)]);
        assert!(s.lookup("cat", 0).unwrap().is_empty());
        assert!(s.lookup("", 5).unwrap().is_empty());
        assert!(s.lookup("!!", 5).unwrap().is_empty());
    }

    #[test]
    fn lookup_is_case_insensitive_but_returns_surface() {
        let s = suggester(&[("New York", 3)]);
        assert_eq!(keys(&s.lookup("new y", 5).unwrap()), vec!["New York"]);
    }

    #[test]
    fn surface_forms_capped_per_analyzed_form() {
        let analyzer = Analyzer::from_settings(&AnalysisSettings::default()).unwrap();
        let options = SuggesterOptions {
            max_surface_forms_per_analyzed_form: 2,
            ..Default::default()
        };
        let entries = [
            SuggestEntry::new("Cat", 1),
            SuggestEntry::new("CAT", 3),
            SuggestEntry::new("cat", 2),
        ];
        let s = Suggester::build(analyzer, options, ExactMatch, &entries).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(keys(&s.lookup("ca", 5).unwrap()), vec!["CAT", "cat"]);
    }

    #[test]
    fn duplicate_entries_keep_best_weight() {
        let s = suggester(&[("cat", 1), ("cat", 9)]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.lookup("c", 5).unwrap()[0].weight, 9);
    }

    #[test]
    fn entries_without_tokens_skipped() {
        let s = suggester(&[("...", 1), ("cat", 1)]);
        assert_eq!(s.entry_count(), 1);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn separator_keeps_words_apart() {
        let s = suggester(&[("ice cream", 1), ("icecream", 1)]);
        assert_eq!(keys(&s.lookup("ice c", 5).unwrap()), vec!["ice cream"]);
    }

    #[test]
    fn explain_reports_exact_automaton() {
        let s = suggester(&[("cat", 1)]);
        let explanation = s.explain("Cat").unwrap();
        assert_eq!(explanation.tokens, vec!["cat"]);
        assert_eq!(explanation.lookup_paths, 1);
        assert!(explanation.deterministic);
        assert_eq!(explanation.prefix_paths, 1);
    }

    #[test]
    fn wide_index_returns_heaviest_completions() {
        let owned: Vec<(String, u32)> = (0..3000).map(|i| (format!("w{i:04}"), i)).collect();
        let entries: Vec<(&str, u32)> = owned.iter().map(|(k, w)| (k.as_str(), *w)).collect();
        let s = suggester(&entries);
        assert_eq!(keys(&s.lookup("w", 3).unwrap()), vec!["w2999", "w2998", "w2997"]);
        assert_eq!(s.queue_depth(1), MIN_QUEUE_DEPTH);
        assert_eq!(s.queue_depth(10), 10 * DEFAULT_MAX_SURFACE_FORMS);
    }

    #[test]
    fn suggester_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Suggester>();
    }
}
