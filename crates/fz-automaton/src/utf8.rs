//! Conversion of code-point automata into byte automata.

use crate::automaton::{Automaton, Builder, StateId};

/// Largest Unicode scalar value.
const MAX_CODE_POINT: u32 = 0x10_FFFF;

/// First UTF-16 surrogate code point.
const SURROGATE_MIN: u32 = 0xD800;

/// Last UTF-16 surrogate code point.
const SURROGATE_MAX: u32 = 0xDFFF;

/// Largest code point of each UTF-8 encoded length below four bytes.
const LENGTH_BOUNDARIES: [u32; 3] = [0x7F, 0x7FF, 0xFFFF];

/// An inclusive byte range.
type ByteRange = (u8, u8);

/// Rewrites an automaton over code points into one over UTF-8 bytes.
///
/// Every code-point edge becomes one or more chains of byte-range edges, one
/// chain per run of code points sharing an encoded length and lead bytes.
/// Surrogates and symbols above U+10FFFF have no encoding and are dropped. The
/// original states keep their ids and accept flags; chain states are appended
/// after them. The result is generally nondeterministic.
pub fn utf32_to_utf8(a: &Automaton) -> Automaton {
    let mut b = Builder::new();
    for state in 0..a.num_states() {
        b.create_state();
        b.set_accept(state, a.is_accept(state));
    }

    for state in 0..a.num_states() {
        for t in a.transitions(state) {
            for sequence in encode_range(t.min, t.max) {
                add_chain(&mut b, state, t.dest, &sequence);
            }
        }
    }

    b.finish()
}

/// Links `from` to `to` through fresh states, one edge per byte range.
fn add_chain(b: &mut Builder, from: StateId, to: StateId, sequence: &[ByteRange]) {
    let mut current = from;
    for (i, &(lo, hi)) in sequence.iter().enumerate() {
        let next = if i + 1 == sequence.len() {
            to
        } else {
            b.create_state()
        };
        b.add_range(current, next, u32::from(lo), u32::from(hi));
        current = next;
    }
}

/// Splits the code-point range `min..=max` into byte-range sequences whose
/// cartesian products are exactly the UTF-8 encodings of the range.
fn encode_range(min: u32, max: u32) -> Vec<Vec<ByteRange>> {
    let max = max.min(MAX_CODE_POINT);
    let mut pending = Vec::new();
    if min <= max {
        if min < SURROGATE_MIN {
            pending.push((min, max.min(SURROGATE_MIN - 1)));
        }
        if max > SURROGATE_MAX {
            pending.push((min.max(SURROGATE_MAX + 1), max));
        }
    }

    let mut out = Vec::new();
    'ranges: while let Some((start, mut end)) = pending.pop() {
        loop {
            for boundary in LENGTH_BOUNDARIES {
                if start <= boundary && boundary < end {
                    pending.push((boundary + 1, end));
                    end = boundary;
                }
            }

            if end <= LENGTH_BOUNDARIES[0] {
                // Both bounds are ASCII here.
                out.push(vec![(start as u8, end as u8)]);
                continue 'ranges;
            }

            // Continuation bytes vary independently only when the range
            // covers whole blocks of 2^6, 2^12 or 2^18 code points.
            let mut split = false;
            for bits in 1..4 {
                let mask = (1u32 << (6 * bits)) - 1;
                if start & !mask == end & !mask {
                    continue;
                }
                if start & mask != 0 {
                    pending.push(((start | mask) + 1, end));
                    end = start | mask;
                    split = true;
                    break;
                }
                if end & mask != mask {
                    pending.push((end & !mask, end));
                    end = (end & !mask) - 1;
                    split = true;
                    break;
                }
            }
            if split {
                continue;
            }

            let (Some(lo), Some(hi)) = (char::from_u32(start), char::from_u32(end)) else {
                continue 'ranges;
            };
            let mut lo_buf = [0u8; 4];
            let mut hi_buf = [0u8; 4];
            let lo_bytes = lo.encode_utf8(&mut lo_buf).as_bytes();
            let hi_bytes = hi.encode_utf8(&mut hi_buf).as_bytes();
            out.push(lo_bytes.iter().copied().zip(hi_bytes.iter().copied()).collect());
            continue 'ranges;
        }
    }
    out
}
