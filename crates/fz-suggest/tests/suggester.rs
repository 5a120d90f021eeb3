//! End-to-end tests: build a suggester from entries, look up, save and reopen.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{collections::BTreeMap, fs, thread};

use fz_config::AnalysisSettings;
use fz_suggest::{
    Analyzer, ExactMatch, FuzzyConfig, FuzzyStrategy, FuzzySuggester, SuggestEntry, SuggestError,
    Suggester, SuggesterOptions, Suggestion, parse_entries,
};
use tempfile::TempDir;

const ENTRIES: &str = "\
# animals
cat\t10
catalog\t3
category\t7
cot\t1
dog\t20
doge\t2
";

fn analyzer() -> Analyzer {
    Analyzer::from_settings(&AnalysisSettings::default()).unwrap()
}

fn fuzzy(config: FuzzyConfig, entries: &[SuggestEntry]) -> FuzzySuggester {
    FuzzySuggester::build(
        analyzer(),
        SuggesterOptions::default(),
        FuzzyStrategy::new(config),
        entries,
    )
    .unwrap()
}

fn keys(results: &[Suggestion]) -> Vec<&str> {
    results.iter().map(|r| r.key.as_str()).collect()
}

#[test]
fn fuzzy_lookup_tolerates_a_typo() {
    let s = fuzzy(FuzzyConfig::default(), &parse_entries(ENTRIES).unwrap());
    let results = s.lookup("cst", 10).unwrap();
    // "cst" is one substitution from "cat" and "cot"; completions of "cat" follow by weight.
    assert_eq!(keys(&results), vec!["cat", "category", "catalog", "cot"]);
}

#[test]
fn exact_suggester_does_not_correct_typos() {
    let entries = parse_entries(ENTRIES).unwrap();
    let s = Suggester::build(analyzer(), SuggesterOptions::default(), ExactMatch, &entries).unwrap();
    assert!(s.lookup("cst", 10).unwrap().is_empty());
    assert_eq!(keys(&s.lookup("do", 10).unwrap()), vec!["dog", "doge"]);
}

#[test]
fn exact_match_comes_first_even_with_low_weight() {
    let s = fuzzy(FuzzyConfig::default(), &parse_entries(ENTRIES).unwrap());
    let results = s.lookup("cot", 3).unwrap();
    assert_eq!(results[0], Suggestion { key: "cot".into(), weight: 1 });
    // Fuzzy hits follow without repeating the exact one.
    assert_eq!(keys(&results), vec!["cot", "cat", "category"]);
}

#[test]
fn first_symbol_is_protected() {
    let s = fuzzy(FuzzyConfig::default(), &parse_entries(ENTRIES).unwrap());
    assert!(s.lookup("bat", 5).unwrap().is_empty());

    let open = fuzzy(
        FuzzyConfig::new(1, true, 0, 3, false).unwrap(),
        &parse_entries(ENTRIES).unwrap(),
    );
    assert_eq!(open.lookup("bat", 1).unwrap()[0].key, "cat");
}

#[test]
fn short_keys_are_not_fuzzy() {
    let s = fuzzy(FuzzyConfig::default(), &parse_entries(ENTRIES).unwrap());
    // "cs" is shorter than the minimum fuzzy length.
    assert!(s.lookup("cs", 5).unwrap().is_empty());
    assert_eq!(keys(&s.lookup("do", 5).unwrap()), vec!["dog", "doge"]);
}

#[test]
fn unicode_mode_measures_code_points() {
    let entries = vec![SuggestEntry::new("cafés", 5)];

    let bytes = fuzzy(FuzzyConfig::default(), &entries);
    assert!(bytes.lookup("cafes", 5).unwrap().is_empty());

    let unicode = fuzzy(FuzzyConfig::new(1, true, 1, 3, true).unwrap(), &entries);
    assert_eq!(keys(&unicode.lookup("cafes", 5).unwrap()), vec!["cafés"]);
    assert_eq!(keys(&unicode.lookup("café", 5).unwrap()), vec!["cafés"]);
}

#[test]
fn synonyms_branch_the_lookup() {
    let mut synonyms = BTreeMap::new();
    synonyms.insert("tv".to_string(), vec!["television".to_string()]);
    let settings = AnalysisSettings {
        synonyms,
        ..Default::default()
    };
    let entries = [
        SuggestEntry::new("television guide", 4),
        SuggestEntry::new("tv stand", 2),
    ];
    let s = FuzzySuggester::build(
        Analyzer::from_settings(&settings).unwrap(),
        SuggesterOptions::default(),
        FuzzyStrategy::default(),
        &entries,
    )
    .unwrap();

    // Both entries are reachable through either spelling.
    assert_eq!(keys(&s.lookup("tv", 5).unwrap()), vec!["television guide", "tv stand"]);
    assert_eq!(
        keys(&s.lookup("televisoin", 5).unwrap()),
        vec!["television guide", "tv stand"]
    );
}

#[test]
fn stop_words_leave_gaps() {
    let settings = AnalysisSettings {
        stop_words: vec!["the".into(), "of".into()],
        ..Default::default()
    };
    let entries = [SuggestEntry::new("The Lord of the Rings", 1)];
    let s = Suggester::build(
        Analyzer::from_settings(&settings).unwrap(),
        SuggesterOptions::default(),
        ExactMatch,
        &entries,
    )
    .unwrap();
    assert_eq!(keys(&s.lookup("the lord of the r", 5).unwrap()), vec!["The Lord of the Rings"]);
    // The gap left by "of the" is significant.
    assert!(s.lookup("lord r", 5).unwrap().is_empty());
}

#[test]
fn path_limit_surfaces_as_lookup_error() {
    let mut synonyms = BTreeMap::new();
    synonyms.insert("tv".to_string(), vec!["television".to_string(), "telly".to_string()]);
    let settings = AnalysisSettings {
        synonyms,
        ..Default::default()
    };
    let s = FuzzySuggester::build(
        Analyzer::from_settings(&settings).unwrap(),
        SuggesterOptions::default(),
        FuzzyStrategy::new(FuzzyConfig::default().with_max_paths(2)),
        &[SuggestEntry::new("tv", 1)],
    )
    .unwrap();
    assert!(matches!(
        s.lookup("tv", 5),
        Err(SuggestError::TooManyPaths { limit: 2 })
    ));
}

#[test]
fn explain_reports_fuzzy_automaton() {
    let s = fuzzy(FuzzyConfig::default(), &parse_entries(ENTRIES).unwrap());
    let explanation = s.explain("cst").unwrap();
    assert_eq!(explanation.tokens, vec!["cst"]);
    assert_eq!(explanation.lookup_paths, 1);
    assert!(explanation.deterministic);
    assert!(explanation.match_states > explanation.lookup_states);
    assert_eq!(explanation.prefix_paths, 2);
}

#[test]
fn save_and_open() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("index");
    let entries = parse_entries(ENTRIES).unwrap();
    let built = fuzzy(FuzzyConfig::default(), &entries);
    built.save(&dir).unwrap();
    assert!(dir.join("suggest.fst").is_file());
    assert!(dir.join("manifest.json").is_file());

    let opened = FuzzySuggester::open(
        &dir,
        analyzer(),
        SuggesterOptions::default(),
        FuzzyStrategy::default(),
    )
    .unwrap();
    assert_eq!(opened.entry_count(), entries.len());
    assert_eq!(opened.settings_hash(), built.settings_hash());
    assert_eq!(
        opened.lookup("cst", 10).unwrap(),
        built.lookup("cst", 10).unwrap()
    );
}

#[test]
fn open_with_different_settings_fails() {
    let temp = TempDir::new().unwrap();
    let built = fuzzy(FuzzyConfig::default(), &parse_entries(ENTRIES).unwrap());
    built.save(temp.path()).unwrap();

    let stemmed = AnalysisSettings {
        stemmer: Some("english".into()),
        ..Default::default()
    };
    let result = FuzzySuggester::open(
        temp.path(),
        Analyzer::from_settings(&stemmed).unwrap(),
        SuggesterOptions::default(),
        FuzzyStrategy::default(),
    );
    assert!(matches!(result, Err(SuggestError::SettingsMismatch { .. })));

    // Edit distance is applied at lookup time, so it does not invalidate the index.
    let wider = FuzzySuggester::open(
        temp.path(),
        analyzer(),
        SuggesterOptions::default(),
        FuzzyStrategy::new(FuzzyConfig::new(2, true, 1, 3, false).unwrap()),
    );
    assert!(wider.is_ok());
}

#[test]
fn symbol_mode_is_a_lookup_time_choice() {
    let entries = [
        SuggestEntry::new("café crème", 4),
        SuggestEntry::new("naïve", 3),
        SuggestEntry::new("cat", 2),
    ];
    let unicode_config = FuzzyConfig::new(1, true, 1, 3, true).unwrap();
    let bytes_built = fuzzy(FuzzyConfig::default(), &entries);
    let unicode_built = fuzzy(unicode_config, &entries);

    let bytes_dir = TempDir::new().unwrap();
    let unicode_dir = TempDir::new().unwrap();
    bytes_built.save(bytes_dir.path()).unwrap();
    unicode_built.save(unicode_dir.path()).unwrap();
    assert_eq!(
        fs::read(bytes_dir.path().join("suggest.fst")).unwrap(),
        fs::read(unicode_dir.path().join("suggest.fst")).unwrap()
    );
    assert_eq!(bytes_built.settings_hash(), unicode_built.settings_hash());

    // An index built in byte mode serves unicode lookups.
    let reopened = FuzzySuggester::open(
        bytes_dir.path(),
        analyzer(),
        SuggesterOptions::default(),
        FuzzyStrategy::new(unicode_config),
    )
    .unwrap();
    assert_eq!(keys(&reopened.lookup("naive", 5).unwrap()), vec!["naïve"]);
    assert_eq!(
        reopened.lookup("naive", 5).unwrap(),
        unicode_built.lookup("naive", 5).unwrap()
    );

    // And one built in unicode mode serves exact lookups.
    let exact = Suggester::open(
        unicode_dir.path(),
        analyzer(),
        SuggesterOptions::default(),
        ExactMatch,
    )
    .unwrap();
    assert_eq!(keys(&exact.lookup("caf", 5).unwrap()), vec!["café crème"]);
}

#[test]
fn open_missing_index() {
    let temp = TempDir::new().unwrap();
    let result = Suggester::open(temp.path(), analyzer(), SuggesterOptions::default(), ExactMatch);
    assert!(matches!(result, Err(SuggestError::MissingIndex { .. })));
}

#[test]
fn concurrent_lookups_share_one_suggester() {
    let s = fuzzy(FuzzyConfig::default(), &parse_entries(ENTRIES).unwrap());
    let expected = s.lookup("cst", 10).unwrap();
    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| s.lookup("cst", 10).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
