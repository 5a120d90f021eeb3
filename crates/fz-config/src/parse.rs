//! Configuration file parsing.
//!
//! Parses individual `.fz.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Fuzzy matching section.
    pub fuzzy: Option<RawFuzzySettings>,
    /// Suggester section.
    pub suggest: Option<RawSuggestSettings>,
    /// Analysis section.
    pub analysis: Option<RawAnalysisSettings>,
    /// Index location section.
    pub index: Option<RawIndexSettings>,
}

/// Raw fuzzy matching settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFuzzySettings {
    /// Maximum edit distance.
    pub max_edits: Option<i64>,
    /// Whether adjacent swaps count as one edit.
    pub transpositions: Option<bool>,
    /// Leading characters exempt from edits.
    pub non_fuzzy_prefix: Option<i64>,
    /// Minimum length before edits are allowed.
    pub min_fuzzy_length: Option<i64>,
    /// Measure edits in Unicode characters.
    pub unicode_aware: Option<bool>,
    /// Safety cap on expanded query paths.
    pub max_paths: Option<usize>,
}

/// Raw suggester settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSuggestSettings {
    /// Exact matches first.
    pub exact_first: Option<bool>,
    /// Token boundaries are significant.
    pub preserve_sep: Option<bool>,
    /// Removed-token holes are significant.
    pub preserve_position_increments: Option<bool>,
    /// Surface forms kept per analyzed form.
    pub max_surface_forms: Option<usize>,
    /// Analyzed forms enumerated per entry.
    pub max_graph_expansions: Option<usize>,
    /// Default number of suggestions.
    pub limit: Option<usize>,
}

/// Raw analysis settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAnalysisSettings {
    /// Stemming language.
    pub stemmer: Option<String>,
    /// Tokens removed before matching.
    pub stop_words: Option<Vec<String>>,
    /// Synonym map. Each value accepts either a single string or an array of strings.
    #[serde_as(as = "Option<HashMap<_, OneOrMany<_>>>")]
    pub synonyms: Option<HashMap<String, Vec<String>>>,
}

/// Raw index location settings.
///
/// Relative paths are resolved against the directory of the config file that defines them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Directory holding the built index.
    pub path: Option<String>,
    /// Entries file the index is built from.
    pub entries: Option<String>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
