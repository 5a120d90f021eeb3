//! Reading suggestion entries from text.
//!
//! One entry per line: `surface<TAB>weight`. The weight is optional and defaults to 1.
//! Blank lines and lines starting with `#` are ignored.

use std::{fs, path::Path};

use crate::{SuggestError, suggester::SuggestEntry};

/// Weight given to entries without one.
pub const DEFAULT_WEIGHT: u32 = 1;

/// Parses entries from text.
pub fn parse_entries(text: &str) -> Result<Vec<SuggestEntry>, SuggestError> {
    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let (surface, weight) = match line.rsplit_once('\t') {
            Some((surface, weight)) => {
                let weight = weight.trim().parse::<u32>().map_err(|e| SuggestError::InvalidEntry {
                    line: idx + 1,
                    message: format!("invalid weight '{}': {e}", weight.trim()),
                })?;
                (surface, weight)
            }
            None => (line, DEFAULT_WEIGHT),
        };

        let surface = surface.trim();
        if surface.is_empty() {
            return Err(SuggestError::InvalidEntry {
                line: idx + 1,
                message: "empty surface form".into(),
            });
        }
        entries.push(SuggestEntry::new(surface, weight));
    }
    Ok(entries)
}

/// Reads and parses an entries file.
pub fn read_entries(path: &Path) -> Result<Vec<SuggestEntry>, SuggestError> {
    let text = fs::read_to_string(path)?;
    parse_entries(&text)
}
