use std::ops::Range;

use memchr::memmem::Finder;

/// Exact byte-for-byte search. `find_iter` already skips past each hit,
/// so the ranges never overlap.
pub fn find_all(source: &str, term: &str) -> Vec<Range<usize>> {
    let finder = Finder::new(term);
    finder
        .find_iter(source.as_bytes())
        .map(|start| start..start + term.len())
        .collect()
}
