//! On-disk layout of a saved suggester.
//!
//! A saved suggester is a directory holding the FST bytes and a JSON manifest. The
//! manifest records a hash of every setting that shapes the FST keys; opening an index
//! with different settings fails instead of returning wrong suggestions.
//!
//! Settings that affect the hash:
//! - Format version (bumped when the key layout changes)
//! - Analysis: stemmer, stop words, synonyms
//! - Suggester options except `exact_first`
//!
//! Keys are UTF-8 bytes whichever symbol mode built them, so the symbol mode is a
//! lookup-time choice like the edit parameters and is not hashed.

use std::{
    collections::BTreeMap,
    fs,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};

use fz_config::AnalysisSettings;
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher24;

use super::SuggesterOptions;
use crate::SuggestError;

/// Current on-disk format version. Bump this when the key layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// File holding the FST.
pub(super) const FST_FILENAME: &str = "suggest.fst";

/// File holding the manifest.
pub(super) const MANIFEST_FILENAME: &str = "manifest.json";

/// Settings that shape index keys.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct IndexingSettings<'a> {
    /// Format version.
    format_version: u32,
    /// Stemmer language.
    stemmer: Option<&'a str>,
    /// Stop words, in configured order.
    stop_words: &'a [String],
    /// Synonym map.
    synonyms: &'a BTreeMap<String, Vec<String>>,
    /// Separator preservation.
    preserve_sep: bool,
    /// Position increment preservation.
    preserve_position_increments: bool,
    /// Surface form cap.
    max_surface_forms: usize,
    /// Graph expansion cap.
    max_graph_expansions: Option<usize>,
}

/// Hashes the settings that shape index keys into a hex string.
pub fn settings_hash(analysis: &AnalysisSettings, options: &SuggesterOptions) -> String {
    let settings = IndexingSettings {
        format_version: FORMAT_VERSION,
        stemmer: analysis.stemmer.as_deref(),
        stop_words: &analysis.stop_words,
        synonyms: &analysis.synonyms,
        preserve_sep: options.preserve_sep,
        preserve_position_increments: options.preserve_position_increments,
        max_surface_forms: options.max_surface_forms_per_analyzed_form,
        max_graph_expansions: options.max_graph_expansions,
    };
    let mut hasher = SipHasher24::new();
    settings.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Metadata stored next to the FST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// On-disk format version.
    pub format_version: u32,
    /// Hash of the settings the index was built with.
    pub settings_hash: String,
    /// Number of entries indexed.
    pub entry_count: usize,
}

impl Manifest {
    /// Loads a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SuggestError> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| SuggestError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Saves the manifest as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SuggestError> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| SuggestError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Writes FST bytes and manifest into `dir`, creating it if needed.
pub(super) fn write_index(dir: &Path, fst: &[u8], manifest: &Manifest) -> Result<(), SuggestError> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(FST_FILENAME), fst)?;
    manifest.save(&dir.join(MANIFEST_FILENAME))
}

/// Reads the manifest and FST bytes from `dir`, checking the settings hash.
pub(super) fn read_index(dir: &Path, expected_hash: &str) -> Result<(Manifest, Vec<u8>), SuggestError> {
    let manifest_path = dir.join(MANIFEST_FILENAME);
    let fst_path: PathBuf = dir.join(FST_FILENAME);
    if !manifest_path.is_file() || !fst_path.is_file() {
        return Err(SuggestError::MissingIndex {
            path: dir.to_path_buf(),
        });
    }

    let manifest = Manifest::load(&manifest_path)?;
    if manifest.format_version != FORMAT_VERSION || manifest.settings_hash != expected_hash {
        return Err(SuggestError::SettingsMismatch {
            path: dir.to_path_buf(),
            stored: manifest.settings_hash,
            current: expected_hash.to_string(),
        });
    }

    let bytes = fs::read(&fst_path)?;
    Ok((manifest, bytes))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn same_settings_same_hash() {
        let analysis = AnalysisSettings::default();
        let options = SuggesterOptions::default();
        assert_eq!(
            settings_hash(&analysis, &options),
            settings_hash(&analysis, &options)
        );
    }

    #[test]
    fn hash_is_hex_string() {
        let h = settings_hash(&AnalysisSettings::default(), &SuggesterOptions::default());
        assert_eq!(h.len(), 16);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn key_shaping_settings_change_hash() {
        let analysis = AnalysisSettings::default();
        let options = SuggesterOptions::default();
        let base = settings_hash(&analysis, &options);

        let stemmed = AnalysisSettings {
            stemmer: Some("english".into()),
            ..Default::default()
        };
        assert_ne!(base, settings_hash(&stemmed, &options));

        let no_sep = SuggesterOptions {
            preserve_sep: false,
            ..Default::default()
        };
        assert_ne!(base, settings_hash(&analysis, &no_sep));
    }

    #[test]
    fn exact_first_does_not_change_hash() {
        let analysis = AnalysisSettings::default();
        let options = SuggesterOptions {
            exact_first: false,
            ..Default::default()
        };
        assert_eq!(
            settings_hash(&analysis, &options),
            settings_hash(&analysis, &SuggesterOptions::default())
        );
    }

    #[test]
    fn manifest_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILENAME);
        let manifest = Manifest {
            format_version: FORMAT_VERSION,
            settings_hash: "0123456789abcdef".into(),
            entry_count: 3,
        };
        manifest.save(&path).unwrap();
        assert_eq!(Manifest::load(&path).unwrap(), manifest);
    }

    #[test]
    fn corrupt_manifest_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILENAME);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Manifest::load(&path),
            Err(SuggestError::Manifest { .. })
        ));
    }

    #[test]
    fn read_missing_index() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            read_index(temp.path(), "x"),
            Err(SuggestError::MissingIndex { .. })
        ));
    }

    #[test]
    fn read_rejects_other_settings() {
        let temp = TempDir::new().unwrap();
        let manifest = Manifest {
            format_version: FORMAT_VERSION,
            settings_hash: "aaaa".into(),
            entry_count: 0,
        };
        write_index(temp.path(), &[], &manifest).unwrap();
        match read_index(temp.path(), "bbbb") {
            Err(SuggestError::SettingsMismatch {
                stored, current, ..
            }) => {
                assert_eq!(stored, "aaaa");
                assert_eq!(current, "bbbb");
            }
            other => panic!("expected settings mismatch, got {other:?}"),
        }
        let (read, bytes) = read_index(temp.path(), "aaaa").unwrap();
        assert_eq!(read, manifest);
        assert!(bytes.is_empty());
    }
}
