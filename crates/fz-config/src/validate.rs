//! Configuration validation.
//!
//! Reports non-fatal issues with a loaded configuration. Hard errors such as an
//! out-of-range edit distance are raised when the suggester is constructed.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `max_edits = 0` turns fuzzy matching into exact prefix matching.
    FuzzinessDisabled,
    /// The default suggestion limit is zero, so lookups return nothing.
    ZeroLimit,
    /// A synonym maps a term to itself.
    SynonymToItself {
        /// The term.
        term: String,
    },
    /// Every path long enough to clear the non-fuzzy prefix is also long enough
    /// for `min_fuzzy_length`, so the latter has no effect.
    MinLengthShadowedByPrefix {
        /// Configured non-fuzzy prefix.
        non_fuzzy_prefix: i64,
        /// Configured minimum fuzzy length.
        min_fuzzy_length: i64,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FuzzinessDisabled => {
                write!(f, "fuzzy.max_edits is 0: only exact prefixes will match")
            }
            Self::ZeroLimit => write!(f, "suggest.limit is 0: lookups return no suggestions"),
            Self::SynonymToItself { term } => {
                write!(f, "synonym '{term}' maps to itself")
            }
            Self::MinLengthShadowedByPrefix {
                non_fuzzy_prefix,
                min_fuzzy_length,
            } => write!(
                f,
                "fuzzy.min_fuzzy_length ({min_fuzzy_length}) has no effect: \
                 fuzzy.non_fuzzy_prefix ({non_fuzzy_prefix}) already requires longer input"
            ),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let fuzzy = &config.fuzzy;

    if fuzzy.max_edits == 0 {
        warnings.push(ConfigWarning::FuzzinessDisabled);
    }

    // Edits apply once length > prefix and length >= min_length.
    if fuzzy.min_fuzzy_length > 0 && fuzzy.non_fuzzy_prefix >= fuzzy.min_fuzzy_length {
        warnings.push(ConfigWarning::MinLengthShadowedByPrefix {
            non_fuzzy_prefix: fuzzy.non_fuzzy_prefix,
            min_fuzzy_length: fuzzy.min_fuzzy_length,
        });
    }

    if config.suggest.limit == 0 {
        warnings.push(ConfigWarning::ZeroLimit);
    }

    for (term, alternatives) in &config.analysis.synonyms {
        if alternatives.iter().any(|alt| alt == term) {
            warnings.push(ConfigWarning::SynonymToItself { term: term.clone() });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn test_fuzziness_disabled() {
        let mut config = Config::default();
        config.fuzzy.max_edits = 0;
        assert_eq!(
            validate_config(&config),
            vec![ConfigWarning::FuzzinessDisabled]
        );
    }

    #[test]
    fn test_prefix_shadows_min_length() {
        let mut config = Config::default();
        config.fuzzy.non_fuzzy_prefix = 3;
        config.fuzzy.min_fuzzy_length = 3;
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("min_fuzzy_length (3)"));
    }

    #[test]
    fn test_zero_limit_and_self_synonym() {
        let mut config = Config::default();
        config.suggest.limit = 0;
        config
            .analysis
            .synonyms
            .insert("car".into(), vec!["auto".into(), "car".into()]);
        let warnings = validate_config(&config);
        assert!(warnings.contains(&ConfigWarning::ZeroLimit));
        assert!(warnings.contains(&ConfigWarning::SynonymToItself { term: "car".into() }));
    }
}
