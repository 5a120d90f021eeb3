//! Text analysis for suggestion keys and entries.
//!
//! The tantivy pipeline is:
//! 1. `SimpleTokenizer` - splits on whitespace and punctuation
//! 2. `LowerCaser` - converts tokens to lowercase
//! 3. `RemoveLongFilter` - removes tokens longer than 40 bytes
//! 4. `StopWordFilter` - removes configured stop words (optional)
//! 5. `Stemmer` - applies language-specific stemming (optional)
//!
//! After tantivy, configured synonyms are emitted at the same position as the token they
//! expand, which turns the token sequence into a branching token graph.

use std::collections::HashMap;

use fz_config::AnalysisSettings;
use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
    TextAnalyzer, TokenStream,
};

use crate::SuggestError;

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// One analyzed token and its place in the token graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    /// Token text after analysis.
    pub text: String,
    /// Position of the token in the original text.
    pub position: usize,
}

/// Parses a stemmer language string into a Tantivy `Language`.
///
/// Supports lowercase language names matching Tantivy's `Language` enum.
pub fn parse_language(name: &str) -> Result<Language, SuggestError> {
    match name.to_lowercase().as_str() {
        "arabic" => Ok(Language::Arabic),
        "danish" => Ok(Language::Danish),
        "dutch" => Ok(Language::Dutch),
        "english" => Ok(Language::English),
        "finnish" => Ok(Language::Finnish),
        "french" => Ok(Language::French),
        "german" => Ok(Language::German),
        "greek" => Ok(Language::Greek),
        "hungarian" => Ok(Language::Hungarian),
        "italian" => Ok(Language::Italian),
        "norwegian" => Ok(Language::Norwegian),
        "portuguese" => Ok(Language::Portuguese),
        "romanian" => Ok(Language::Romanian),
        "russian" => Ok(Language::Russian),
        "spanish" => Ok(Language::Spanish),
        "swedish" => Ok(Language::Swedish),
        "tamil" => Ok(Language::Tamil),
        "turkish" => Ok(Language::Turkish),
        other => Err(SuggestError::InvalidLanguage(other.to_string())),
    }
}

/// Builds the tantivy part of the pipeline.
fn build_text_analyzer(language: Option<Language>, stop_words: &[String]) -> TextAnalyzer {
    let base = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH));
    let stop_words: Vec<String> = stop_words.iter().map(|w| w.to_lowercase()).collect();

    match (language, stop_words.is_empty()) {
        (None, true) => base.build(),
        (None, false) => base.filter(StopWordFilter::remove(stop_words)).build(),
        (Some(language), true) => base.filter(Stemmer::new(language)).build(),
        (Some(language), false) => base
            .filter(StopWordFilter::remove(stop_words))
            .filter(Stemmer::new(language))
            .build(),
    }
}

/// Analyzer turning text into a token graph.
///
/// Holds the configuration it was built from so that indexes can record it.
#[derive(Clone)]
pub struct Analyzer {
    /// Tantivy pipeline; cloned per call since token streams borrow it mutably.
    text: TextAnalyzer,
    /// Analyzed term -> analyzed alternatives.
    synonyms: HashMap<String, Vec<String>>,
    /// Settings this analyzer was built from.
    settings: AnalysisSettings,
}

impl Analyzer {
    /// Builds an analyzer from analysis settings.
    ///
    /// Synonym terms and alternatives are analyzed with the same pipeline and must each
    /// produce exactly one token.
    pub fn from_settings(settings: &AnalysisSettings) -> Result<Self, SuggestError> {
        let language = settings
            .stemmer
            .as_deref()
            .map(parse_language)
            .transpose()?;
        let text = build_text_analyzer(language, &settings.stop_words);

        let mut analyzer = Self {
            text,
            synonyms: HashMap::new(),
            settings: settings.clone(),
        };

        let mut synonyms: HashMap<String, Vec<String>> = HashMap::new();
        for (term, alternatives) in &settings.synonyms {
            let key = analyzer.single_token(term)?;
            let entry = synonyms.entry(key.clone()).or_default();
            for alternative in alternatives {
                let alt = analyzer.single_token(alternative)?;
                if alt != key && !entry.contains(&alt) {
                    entry.push(alt);
                }
            }
        }
        analyzer.synonyms = synonyms;
        Ok(analyzer)
    }

    /// Settings this analyzer was built from.
    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Analyzes `text` into tokens ordered by position.
    ///
    /// Synonym alternatives follow the token they expand and share its position.
    pub fn analyze(&self, text: &str) -> Vec<AnalyzedToken> {
        let mut tokens = Vec::new();
        for token in self.tantivy_tokens(text) {
            let alternatives = self.synonyms.get(&token.text).cloned();
            let position = token.position;
            tokens.push(token);
            for alt in alternatives.into_iter().flatten() {
                tokens.push(AnalyzedToken {
                    text: alt,
                    position,
                });
            }
        }
        tokens
    }

    /// Runs only the tantivy pipeline.
    fn tantivy_tokens(&self, text: &str) -> Vec<AnalyzedToken> {
        let mut analyzer = self.text.clone();
        let mut stream = analyzer.token_stream(text);
        let mut tokens = Vec::new();
        while let Some(token) = stream.next() {
            tokens.push(AnalyzedToken {
                text: token.text.clone(),
                position: token.position,
            });
        }
        tokens
    }

    /// Analyzes `text` and requires exactly one resulting token.
    fn single_token(&self, text: &str) -> Result<String, SuggestError> {
        let mut tokens = self.tantivy_tokens(text);
        match tokens.len() {
            1 => Ok(tokens.remove(0).text),
            n => Err(SuggestError::InvalidSynonym {
                term: text.to_string(),
                tokens: n,
            }),
        }
    }
}
