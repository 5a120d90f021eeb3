//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving index paths.

use std::path::{Path, PathBuf};

use crate::{
    AnalysisSettings, Config, FuzzySettings, IndexSettings, SuggestSettings,
    parse::{
        RawAnalysisSettings, RawConfig, RawFuzzySettings, RawIndexSettings, RawSuggestSettings,
    },
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Stop words: the highest-precedence list wins as a whole
/// - Synonyms: merged by term, first definition for each term wins
/// - Index paths: first defined value wins, resolved against its own config file
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let Some(closest) = configs.first() else {
        return Config::default();
    };

    let mut fuzzy = FuzzySettings::default();
    let mut suggest = SuggestSettings::default();
    let mut analysis = AnalysisSettings::default();
    let mut index = IndexSettings::default();

    // Lowest precedence first so higher precedence overwrites
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(ref v) = raw.fuzzy {
            apply_raw_fuzzy(&mut fuzzy, v);
        }
        if let Some(ref v) = raw.suggest {
            apply_raw_suggest(&mut suggest, v);
        }
        if let Some(ref v) = raw.analysis {
            apply_raw_analysis(&mut analysis, v);
        }
        if let Some(ref v) = raw.index {
            apply_raw_index(&mut index, v, parsed.dir());
        }
    }

    Config {
        fuzzy,
        suggest,
        analysis,
        index,
        config_root: Some(closest.dir().to_path_buf()),
    }
}

/// Applies raw fuzzy settings to result, overwriting any present values.
fn apply_raw_fuzzy(result: &mut FuzzySettings, raw: &RawFuzzySettings) {
    if let Some(v) = raw.max_edits {
        result.max_edits = v;
    }
    if let Some(v) = raw.transpositions {
        result.transpositions = v;
    }
    if let Some(v) = raw.non_fuzzy_prefix {
        result.non_fuzzy_prefix = v;
    }
    if let Some(v) = raw.min_fuzzy_length {
        result.min_fuzzy_length = v;
    }
    if let Some(v) = raw.unicode_aware {
        result.unicode_aware = v;
    }
    if let Some(v) = raw.max_paths {
        result.max_paths = Some(v);
    }
}

/// Applies raw suggester settings to result.
fn apply_raw_suggest(result: &mut SuggestSettings, raw: &RawSuggestSettings) {
    if let Some(v) = raw.exact_first {
        result.exact_first = v;
    }
    if let Some(v) = raw.preserve_sep {
        result.preserve_sep = v;
    }
    if let Some(v) = raw.preserve_position_increments {
        result.preserve_position_increments = v;
    }
    if let Some(v) = raw.max_surface_forms {
        result.max_surface_forms = v;
    }
    if let Some(v) = raw.max_graph_expansions {
        result.max_graph_expansions = Some(v);
    }
    if let Some(v) = raw.limit {
        result.limit = v;
    }
}

/// Applies raw analysis settings to result.
///
/// Synonym entries overwrite per term, so the closest definition of each term survives.
fn apply_raw_analysis(result: &mut AnalysisSettings, raw: &RawAnalysisSettings) {
    if let Some(ref v) = raw.stemmer {
        result.stemmer = Some(v.clone());
    }
    if let Some(ref v) = raw.stop_words {
        result.stop_words = v.clone();
    }
    if let Some(ref synonyms) = raw.synonyms {
        for (term, alternatives) in synonyms {
            result
                .synonyms
                .insert(term.clone(), alternatives.clone());
        }
    }
}

/// Applies raw index settings to result, resolving paths against `config_dir`.
fn apply_raw_index(result: &mut IndexSettings, raw: &RawIndexSettings, config_dir: &Path) {
    if let Some(ref v) = raw.path {
        result.path = Some(config_dir.join(v));
    }
    if let Some(ref v) = raw.entries {
        result.entries = Some(config_dir.join(v));
    }
}
