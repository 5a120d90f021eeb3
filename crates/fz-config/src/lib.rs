//! Configuration system for fz.
//!
//! fz uses TOML configuration files named `.fz.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.fz.toml` files found,
//! then loading `~/.fz.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawAnalysisSettings, RawConfig, RawFuzzySettings, RawIndexSettings, RawSuggestSettings,
    parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for fz.
///
/// This represents the fully resolved configuration after merging all discovered `.fz.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Fuzzy matching parameters.
    pub fuzzy: FuzzySettings,
    /// Suggester options.
    pub suggest: SuggestSettings,
    /// Text analysis settings.
    pub analysis: AnalysisSettings,
    /// Index and entries locations.
    pub index: IndexSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.fz.toml` files.
    ///
    /// This is the main entry point for loading configuration. It:
    /// 1. Discovers all `.fz.toml` files from `cwd` up to the filesystem root
    /// 2. Appends `~/.fz.toml` if it exists
    /// 3. Parses each file
    /// 4. Merges them according to precedence rules (closest to `cwd` wins)
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - Fuzzy matching disabled by `max_edits = 0`
    /// - A zero default result limit
    /// - Synonyms that map a term to itself
    /// - A `min_fuzzy_length` made irrelevant by a longer non-fuzzy prefix
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output uses the same layout as a `.fz.toml` file. The index section is omitted
    /// since its paths are resolved against the config files they came from.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            fuzzy: &self.fuzzy,
            suggest: &self.suggest,
            analysis: &self.analysis,
        };
        toml::to_string_pretty(&serializable).map_err(ConfigError::SerializeToml)
    }
}

/// Fuzzy matching parameters.
///
/// The numeric fields are signed so that out-of-range values survive parsing and are rejected
/// with a descriptive error when the fuzzy matcher is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FuzzySettings {
    /// Maximum number of edits a suggestion may differ by.
    pub max_edits: i64,
    /// Whether swapping two adjacent characters counts as one edit.
    pub transpositions: bool,
    /// Number of leading characters that must match exactly.
    pub non_fuzzy_prefix: i64,
    /// Minimum query length before any edit is allowed.
    pub min_fuzzy_length: i64,
    /// Measure edits in Unicode characters instead of bytes.
    pub unicode_aware: bool,
    /// Upper bound on the analyzed paths expanded per query (unbounded when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_paths: Option<usize>,
}

impl Default for FuzzySettings {
    fn default() -> Self {
        Self {
            max_edits: 1,
            transpositions: true,
            non_fuzzy_prefix: 1,
            min_fuzzy_length: 3,
            unicode_aware: false,
            max_paths: None,
        }
    }
}

/// Options for building and querying the suggester.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SuggestSettings {
    /// Return exact matches ahead of better-weighted completions.
    pub exact_first: bool,
    /// Keep token boundaries significant when matching.
    pub preserve_sep: bool,
    /// Keep holes left by removed tokens significant when matching.
    pub preserve_position_increments: bool,
    /// Surface forms kept per analyzed form.
    pub max_surface_forms: usize,
    /// Cap on analyzed forms enumerated per entry (unbounded when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_graph_expansions: Option<usize>,
    /// Default number of suggestions returned.
    pub limit: usize,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self {
            exact_first: true,
            preserve_sep: true,
            preserve_position_increments: true,
            max_surface_forms: 256,
            max_graph_expansions: None,
            limit: 5,
        }
    }
}

/// Text analysis settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Stemming language (no stemming when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stemmer: Option<String>,
    /// Tokens removed before matching.
    pub stop_words: Vec<String>,
    /// Single-token synonyms: term -> alternatives emitted at the same position.
    pub synonyms: BTreeMap<String, Vec<String>>,
}

/// Locations of the suggestion index and its source entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSettings {
    /// Directory holding the built index.
    pub path: Option<PathBuf>,
    /// Entries file the index is built from.
    pub entries: Option<PathBuf>,
}

/// Borrowed view of the settings sections for TOML output.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Fuzzy matching parameters.
    fuzzy: &'a FuzzySettings,
    /// Suggester options.
    suggest: &'a SuggestSettings,
    /// Text analysis settings.
    analysis: &'a AnalysisSettings,
}
