//! Integration tests for fz-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge -> validate.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use fz_config::{CONFIG_FILENAME, Config, ConfigError, ConfigWarning, is_global_config};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a config file into `rel_dir` and returns its path.
    fn create_config(&self, rel_dir: &str, content: &str) -> PathBuf {
        let path = self.create_dir(rel_dir).join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_no_config_returns_default() {
    let env = TestEnv::new();
    // A root config with no settings isolates the test from ~/.fz.toml
    env.create_config("", "root = true\n");
    let config = Config::load(env.path()).unwrap();

    assert_eq!(config.fuzzy.max_edits, 1);
    assert_eq!(config.suggest.limit, 5);
    assert!(config.analysis.stemmer.is_none());
    assert!(config.validate().is_empty());
}

#[test]
fn test_load_nested_configs() {
    let env = TestEnv::new();
    env.create_config(
        "",
        r#"
root = true

[fuzzy]
max_edits = 2
unicode_aware = true

[analysis]
stemmer = "english"

[analysis.synonyms]
tv = "television"

[index]
entries = "words.tsv"
"#,
    );
    env.create_config(
        "project",
        r#"
[fuzzy]
non_fuzzy_prefix = 0

[suggest]
limit = 10
exact_first = false

[analysis.synonyms]
tv = ["telly", "television"]

[index]
path = ".fz-index"
"#,
    );
    let cwd = env.create_dir("project/src");

    let config = Config::load(&cwd).unwrap();

    assert_eq!(config.fuzzy.max_edits, 2);
    assert_eq!(config.fuzzy.non_fuzzy_prefix, 0);
    assert!(config.fuzzy.unicode_aware);
    assert_eq!(config.suggest.limit, 10);
    assert!(!config.suggest.exact_first);
    assert_eq!(config.analysis.stemmer.as_deref(), Some("english"));
    assert_eq!(config.analysis.synonyms["tv"], vec!["telly", "television"]);
    assert_eq!(
        config.index.path,
        Some(env.path().join("project").join(".fz-index"))
    );
    assert_eq!(config.index.entries, Some(env.path().join("words.tsv")));
    assert_eq!(config.config_root, Some(env.path().join("project")));
}

#[test]
fn test_load_reports_parse_errors() {
    let env = TestEnv::new();
    env.create_config("", "root = true\n[fuzzy\n");

    let err = Config::load(env.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}

#[test]
fn test_load_from_files_respects_order() {
    let env = TestEnv::new();
    let a = env.create_config("a", "[suggest]\nlimit = 1\n");
    let b = env.create_config("b", "[suggest]\nlimit = 2\nmax_surface_forms = 8\n");

    let config = Config::load_from_files(&[a, b]).unwrap();
    assert_eq!(config.suggest.limit, 1);
    assert_eq!(config.suggest.max_surface_forms, 8);
}

#[test]
fn test_validation_warnings_from_loaded_config() {
    let env = TestEnv::new();
    env.create_config(
        "",
        "root = true\n[fuzzy]\nmax_edits = 0\n[analysis.synonyms]\ncar = \"car\"\n",
    );

    let warnings = Config::load(env.path()).unwrap().validate();
    assert!(warnings.contains(&ConfigWarning::FuzzinessDisabled));
    assert!(warnings.contains(&ConfigWarning::SynonymToItself { term: "car".into() }));
}

#[test]
fn test_settings_round_trip_through_file() {
    let env = TestEnv::new();
    let original = env.create_config(
        "orig",
        "root = true\n[fuzzy]\nmax_edits = 2\nmax_paths = 16\n[suggest]\nmax_graph_expansions = 4\n",
    );
    let config = Config::load_from_files(&[original]).unwrap();

    let rendered = env.create_config("copy", &config.settings_to_toml().unwrap());
    let reloaded = Config::load_from_files(&[rendered]).unwrap();

    assert_eq!(reloaded.fuzzy, config.fuzzy);
    assert_eq!(reloaded.suggest, config.suggest);
    assert_eq!(reloaded.analysis, config.analysis);
    assert!(!is_global_config(&env.path().join("copy").join(CONFIG_FILENAME)));
}
