//! Conversion of analyzed token graphs into automata.

use fz_automaton::{Automaton, Builder, StateId};

use crate::analyzer::AnalyzedToken;

/// Symbol placed between tokens.
pub const SEP_LABEL: u32 = 0x1F;

/// Byte separating the analyzed form from the surface form in index keys.
pub const END_BYTE: u8 = 0x00;

/// Turns analyzed tokens into an automaton accepting every path through the token graph.
///
/// Tokens sharing a position are alternatives. This is a plain value: strategies derive
/// variants with [`Self::with_unicode_arcs`] instead of mutating a shared converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenStreamToAutomaton {
    /// Emit [`SEP_LABEL`] between tokens.
    preserve_sep: bool,
    /// Emit one extra separator per position left empty by removed tokens.
    preserve_position_increments: bool,
    /// Label edges with code points instead of UTF-8 bytes.
    unicode_arcs: bool,
}

impl TokenStreamToAutomaton {
    /// Creates a byte-labelled converter.
    pub fn new(preserve_sep: bool, preserve_position_increments: bool) -> Self {
        Self {
            preserve_sep,
            preserve_position_increments,
            unicode_arcs: false,
        }
    }

    /// Returns a copy labelling edges with code points when `unicode_arcs` is true.
    #[must_use]
    pub fn with_unicode_arcs(self, unicode_arcs: bool) -> Self {
        Self {
            unicode_arcs,
            ..self
        }
    }

    /// Whether edges carry code points.
    pub fn unicode_arcs(&self) -> bool {
        self.unicode_arcs
    }

    /// Builds the automaton for `tokens`, which must be ordered by position.
    ///
    /// No tokens yields the automaton accepting only the empty sequence.
    pub fn to_automaton(&self, tokens: &[AnalyzedToken]) -> Automaton {
        let mut b = Builder::new();
        let mut node = b.create_state();
        // Holes before the first token count like holes between tokens.
        let mut previous_position: Option<usize> = None;

        let mut rest = tokens;
        while let Some(first) = rest.first() {
            let position = first.position;
            let group_len = rest
                .iter()
                .take_while(|t| t.position == position)
                .count();
            let (group, tail) = rest.split_at(group_len);
            rest = tail;

            let gap = match previous_position {
                Some(prev) => position.saturating_sub(prev + 1),
                None => position,
            };
            let separators = self.separator_count(previous_position.is_some(), gap);
            for _ in 0..separators {
                let next = b.create_state();
                b.add_transition(node, next, SEP_LABEL);
                node = next;
            }

            let end = b.create_state();
            for token in group {
                self.add_token(&mut b, node, end, &token.text);
            }
            node = end;
            previous_position = Some(position);
        }

        b.set_accept(node, true);
        b.finish()
    }

    /// Number of separators before a token group.
    fn separator_count(&self, after_token: bool, gap: usize) -> usize {
        if !self.preserve_sep {
            return 0;
        }
        let holes = if self.preserve_position_increments {
            gap
        } else {
            0
        };
        usize::from(after_token) + holes
    }

    /// Adds a chain spelling `text` from `from` to `to`.
    fn add_token(&self, b: &mut Builder, from: StateId, to: StateId, text: &str) {
        let symbols: Vec<u32> = if self.unicode_arcs {
            text.chars().map(u32::from).collect()
        } else {
            text.bytes().map(u32::from).collect()
        };
        let Some((&last, init)) = symbols.split_last() else {
            return;
        };
        let mut current = from;
        for &symbol in init {
            let next = b.create_state();
            b.add_transition(current, next, symbol);
            current = next;
        }
        b.add_transition(current, to, last);
    }
}
