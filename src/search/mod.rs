//! Occurrence finding. Both modes end in `memchr::memmem`; case-insensitive
//! search folds source and term first.

pub(crate) mod exact;
pub(crate) mod folded;

use std::ops::Range;

/// Byte ranges of the non-overlapping occurrences of `term` in `source`,
/// leftmost first. Every range lies on `char` boundaries of `source`.
///
/// An empty `term` matches nothing.
pub fn find_occurrences(source: &str, term: &str, case_sensitive: bool) -> Vec<Range<usize>> {
    if term.is_empty() || source.is_empty() {
        return Vec::new();
    }

    if case_sensitive || is_caseless(term) {
        exact::find_all(source, term)
    } else {
        folded::find_all(source, term)
    }
}

/// ASCII terms without letters fold to themselves, and no non-ASCII char
/// folds onto them, so the exact finder gives the same answer faster.
fn is_caseless(term: &str) -> bool {
    term.bytes().all(|b| b.is_ascii() && !b.is_ascii_alphabetic())
}
