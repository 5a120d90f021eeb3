//! Error types for the fz-suggest crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when building, querying or storing a suggester.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// `max_edits` outside the supported range.
    #[error("max_edits must be between 0 and {max} inclusive (got {value})")]
    InvalidMaxEdits {
        /// Rejected value.
        value: i64,
        /// Largest supported edit distance.
        max: u8,
    },

    /// Negative `non_fuzzy_prefix`.
    #[error("non_fuzzy_prefix must be >= 0 (got {0})")]
    InvalidNonFuzzyPrefix(i64),

    /// Negative `min_fuzzy_length`.
    #[error("min_fuzzy_length must be >= 0 (got {0})")]
    InvalidMinFuzzyLength(i64),

    /// The query automaton expands to more paths than allowed.
    #[error("query expands to more than {limit} analyzed paths")]
    TooManyPaths {
        /// Configured path limit.
        limit: usize,
    },

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),

    /// A synonym term or alternative does not analyze to exactly one token.
    #[error("synonym '{term}' must analyze to a single token (got {tokens})")]
    InvalidSynonym {
        /// Offending text.
        term: String,
        /// Number of tokens it produced.
        tokens: usize,
    },

    /// Malformed line in an entries file.
    #[error("line {line}: {message}")]
    InvalidEntry {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Failed to build or load the FST.
    #[error("fst error: {0}")]
    Fst(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to read or write the index manifest.
    #[error("invalid manifest at {path}: {message}")]
    Manifest {
        /// Path to the manifest file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The stored index was built with different settings.
    #[error("index at {path} was built with different settings (stored {stored}, current {current}); rebuild it")]
    SettingsMismatch {
        /// Index directory.
        path: PathBuf,
        /// Hash recorded in the manifest.
        stored: String,
        /// Hash of the current settings.
        current: String,
    },

    /// No index exists at the given location.
    #[error("no index found at {path}")]
    MissingIndex {
        /// Index directory.
        path: PathBuf,
    },
}

impl SuggestError {
    /// Creates an `Fst` error from a `tantivy_fst` error.
    pub(crate) fn fst(source: &tantivy_fst::Error) -> Self {
        Self::Fst(source.to_string())
    }
}
