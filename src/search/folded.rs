use std::ops::Range;

use memchr::memmem::Finder;

/// Case-insensitive search.
///
/// Source and term are folded once, char by char, and the folded source is
/// searched with `memmem`, so the cost stays linear in both lengths. Folding
/// maps one char to one char but may change its UTF-8 width (KELVIN SIGN is
/// three bytes, `k` is one), so hits are mapped back through an offset table
/// when any width changed. Ranges point into `source`, so callers slice the
/// original casing out of them.
pub fn find_all(source: &str, term: &str) -> Vec<Range<usize>> {
    let needle: String = term.chars().map(fold).collect();
    let folded = Folded::new(source);

    Finder::new(needle.as_bytes())
        .find_iter(folded.text.as_bytes())
        .map(|start| folded.original(start)..folded.original(start + needle.len()))
        .collect()
}

/// A folded copy of a source string plus the way back to source offsets.
struct Folded {
    text: String,
    /// Source offset for each folded byte offset, plus one past the end.
    /// Empty when folding kept every char's width, since offsets then agree.
    offsets: Vec<usize>,
}

impl Folded {
    fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut offsets = Vec::new();

        for (i, c) in source.char_indices() {
            let f = fold(c);
            if offsets.is_empty() && f.len_utf8() != c.len_utf8() {
                // First width change: backfill the identity prefix.
                offsets.extend(0..text.len());
            }
            if !offsets.is_empty() || f.len_utf8() != c.len_utf8() {
                offsets.extend(std::iter::repeat_n(i, f.len_utf8()));
            }
            text.push(f);
        }
        if !offsets.is_empty() {
            offsets.push(source.len());
        }

        Self { text, offsets }
    }

    /// Source offset of a char boundary in the folded text.
    fn original(&self, at: usize) -> usize {
        if self.offsets.is_empty() {
            at
        } else {
            self.offsets[at]
        }
    }
}

/// Simple one-to-one case fold: uppercase then lowercase, so that every
/// case variant (`ſ`, `s`, `S`; `ς`, `σ`, `Σ`; KELVIN SIGN, `k`, `K`) lands on
/// the same char. Chars whose case mapping expands to several chars fold
/// through their lowercase form when that is single, else stay as they are.
fn fold(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    let upper = single(c.to_uppercase()).unwrap_or(c);
    single(upper.to_lowercase())
        .or_else(|| single(c.to_lowercase()))
        .unwrap_or(c)
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
