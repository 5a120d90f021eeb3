//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use fz_automaton::Automaton;
use fz_config::Config;
use fz_suggest::{
    Analyzer, ExactMatch, FstPath, FuzzyConfig, FuzzyStrategy, MatchStrategy, SuggestEntry,
    SuggestError, SuggestFst, Suggester, SuggesterOptions, TokenStreamToAutomaton, read_entries,
};

use super::args::{MatchArgs, SourceArgs};

/// Strategy picked on the command line.
#[derive(Debug, Clone, Copy)]
pub enum CliStrategy {
    /// `--exact`.
    Exact(ExactMatch),
    /// Fuzzy matching with merged settings.
    Fuzzy(FuzzyStrategy),
}

impl MatchStrategy for CliStrategy {
    fn token_converter(&self, base: TokenStreamToAutomaton) -> TokenStreamToAutomaton {
        match self {
            Self::Exact(s) => s.token_converter(base),
            Self::Fuzzy(s) => s.token_converter(base),
        }
    }

    fn convert_automaton(&self, a: Automaton) -> Automaton {
        match self {
            Self::Exact(s) => s.convert_automaton(a),
            Self::Fuzzy(s) => s.convert_automaton(a),
        }
    }

    fn build_match_automaton(&self, lookup: &Automaton) -> Result<Automaton, SuggestError> {
        match self {
            Self::Exact(s) => s.build_match_automaton(lookup),
            Self::Fuzzy(s) => s.build_match_automaton(lookup),
        }
    }

    fn full_prefix_paths(
        &self,
        prefix_paths: Vec<FstPath>,
        lookup: &Automaton,
        fst: &SuggestFst,
    ) -> Result<Vec<FstPath>, SuggestError> {
        match self {
            Self::Exact(s) => s.full_prefix_paths(prefix_paths, lookup, fst),
            Self::Fuzzy(s) => s.full_prefix_paths(prefix_paths, lookup, fst),
        }
    }
}

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = Config::load(&cwd).map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;
        Ok(Self { cwd, config })
    }

    /// Builds the analyzer described by the configuration.
    pub fn analyzer(&self) -> Result<Analyzer, ExitCode> {
        Analyzer::from_settings(&self.config.analysis).map_err(|e| {
            eprintln!("error: invalid analysis settings: {e}");
            ExitCode::FAILURE
        })
    }

    /// Suggester options from the configuration.
    pub fn options(&self) -> SuggesterOptions {
        SuggesterOptions::from_settings(&self.config.suggest)
    }

    /// Merges command-line overrides into the configured fuzzy settings.
    pub fn strategy(&self, args: &MatchArgs) -> Result<CliStrategy, ExitCode> {
        if args.exact {
            return Ok(CliStrategy::Exact(ExactMatch));
        }

        let mut settings = self.config.fuzzy.clone();
        if let Some(max_edits) = args.max_edits {
            settings.max_edits = max_edits;
        }
        if let Some(prefix) = args.prefix {
            settings.non_fuzzy_prefix = prefix;
        }
        if let Some(min_length) = args.min_length {
            settings.min_fuzzy_length = min_length;
        }
        settings.unicode_aware |= args.unicode;
        settings.transpositions &= !args.no_transpositions;

        let config = FuzzyConfig::from_settings(&settings).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })?;
        Ok(CliStrategy::Fuzzy(FuzzyStrategy::new(config)))
    }

    /// Opens a saved index or builds one from an entries file.
    pub fn suggester(
        &self,
        source: &SourceArgs,
        strategy: CliStrategy,
    ) -> Result<Suggester<CliStrategy>, ExitCode> {
        let analyzer = self.analyzer()?;
        let options = self.options();

        if let Some(path) = self.entries_path(source) {
            let entries = read_entries_or_failure(&path)?;
            return Suggester::build(analyzer, options, strategy, &entries).map_err(|e| {
                eprintln!("error: failed to build suggester: {e}");
                ExitCode::FAILURE
            });
        }

        let Some(dir) = source.index.clone().or_else(|| self.config.index.path.clone()) else {
            eprintln!("error: no suggestion source");
            eprintln!("Pass --index or --entries, or set [index] path or entries in .fz.toml.");
            return Err(ExitCode::FAILURE);
        };
        Suggester::open(&dir, analyzer, options, strategy).map_err(|e| {
            eprintln!("error: failed to open index: {e}");
            ExitCode::FAILURE
        })
    }

    /// Entries file to build from, if the source selects one.
    fn entries_path(&self, source: &SourceArgs) -> Option<PathBuf> {
        if let Some(entries) = &source.entries {
            return Some(entries.clone());
        }
        if source.index.is_some() || self.config.index.path.is_some() {
            return None;
        }
        self.config.index.entries.clone()
    }
}

/// Reads an entries file or exits with an error.
pub fn read_entries_or_failure(path: &Path) -> Result<Vec<SuggestEntry>, ExitCode> {
    read_entries(path).map_err(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        ExitCode::FAILURE
    })
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}
