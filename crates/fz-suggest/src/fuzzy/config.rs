//! Validated fuzzy matching parameters.

use fz_automaton::MAXIMUM_SUPPORTED_DISTANCE;
use fz_config::FuzzySettings;

use crate::SuggestError;

/// Default maximum number of edits.
pub const DEFAULT_MAX_EDITS: u8 = 1;

/// Default for counting an adjacent swap as one edit.
pub const DEFAULT_TRANSPOSITIONS: bool = true;

/// Default number of leading symbols that must match exactly.
pub const DEFAULT_NON_FUZZY_PREFIX: usize = 1;

/// Default minimum path length before edits are allowed.
pub const DEFAULT_MIN_FUZZY_LENGTH: usize = 3;

/// Default symbol mode.
pub const DEFAULT_UNICODE_AWARE: bool = false;

/// Fuzzy matching parameters, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuzzyConfig {
    /// Maximum edits accepted.
    max_edits: u8,
    /// Whether an adjacent swap counts as a single edit.
    transpositions: bool,
    /// Leading symbols exempt from edits.
    non_fuzzy_prefix: usize,
    /// Minimum path length for edits to apply.
    min_fuzzy_length: usize,
    /// Measure edits in code points instead of bytes.
    unicode_aware: bool,
    /// Cap on the number of query paths; `None` enumerates them all.
    max_paths: Option<usize>,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            max_edits: DEFAULT_MAX_EDITS,
            transpositions: DEFAULT_TRANSPOSITIONS,
            non_fuzzy_prefix: DEFAULT_NON_FUZZY_PREFIX,
            min_fuzzy_length: DEFAULT_MIN_FUZZY_LENGTH,
            unicode_aware: DEFAULT_UNICODE_AWARE,
            max_paths: None,
        }
    }
}

impl FuzzyConfig {
    /// Validates and creates a configuration.
    ///
    /// Fails if `max_edits` is outside `0..=MAXIMUM_SUPPORTED_DISTANCE` or either length
    /// parameter is negative.
    pub fn new(
        max_edits: i64,
        transpositions: bool,
        non_fuzzy_prefix: i64,
        min_fuzzy_length: i64,
        unicode_aware: bool,
    ) -> Result<Self, SuggestError> {
        let max_edits = u8::try_from(max_edits)
            .ok()
            .filter(|&d| d <= MAXIMUM_SUPPORTED_DISTANCE)
            .ok_or(SuggestError::InvalidMaxEdits {
                value: max_edits,
                max: MAXIMUM_SUPPORTED_DISTANCE,
            })?;
        let non_fuzzy_prefix = usize::try_from(non_fuzzy_prefix)
            .map_err(|_| SuggestError::InvalidNonFuzzyPrefix(non_fuzzy_prefix))?;
        let min_fuzzy_length = usize::try_from(min_fuzzy_length)
            .map_err(|_| SuggestError::InvalidMinFuzzyLength(min_fuzzy_length))?;

        Ok(Self {
            max_edits,
            transpositions,
            non_fuzzy_prefix,
            min_fuzzy_length,
            unicode_aware,
            max_paths: None,
        })
    }

    /// Builds a configuration from loaded settings.
    pub fn from_settings(settings: &FuzzySettings) -> Result<Self, SuggestError> {
        let config = Self::new(
            settings.max_edits,
            settings.transpositions,
            settings.non_fuzzy_prefix,
            settings.min_fuzzy_length,
            settings.unicode_aware,
        )?;
        Ok(match settings.max_paths {
            Some(limit) => config.with_max_paths(limit),
            None => config,
        })
    }

    /// Returns a copy that fails lookups whose query has more than `limit` paths.
    #[must_use]
    pub fn with_max_paths(self, limit: usize) -> Self {
        Self {
            max_paths: Some(limit),
            ..self
        }
    }

    /// Maximum edits accepted.
    pub fn max_edits(&self) -> u8 {
        self.max_edits
    }

    /// Whether an adjacent swap counts as one edit.
    pub fn transpositions(&self) -> bool {
        self.transpositions
    }

    /// Leading symbols that must match exactly.
    pub fn non_fuzzy_prefix(&self) -> usize {
        self.non_fuzzy_prefix
    }

    /// Minimum path length for edits to apply.
    pub fn min_fuzzy_length(&self) -> usize {
        self.min_fuzzy_length
    }

    /// Whether symbols are code points.
    pub fn unicode_aware(&self) -> bool {
        self.unicode_aware
    }

    /// Path enumeration limit.
    pub fn max_paths(&self) -> Option<usize> {
        self.max_paths
    }

    /// Largest symbol of the active alphabet.
    pub fn alphabet_max(&self) -> u32 {
        if self.unicode_aware {
            u32::from(char::MAX)
        } else {
            u32::from(u8::MAX)
        }
    }
}
