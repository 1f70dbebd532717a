//! The match-and-render core: split source text into plain and match runs.

use crate::search;
use crate::types::{Segment, Span};

/// Split `source` into ordered plain/match segments for `term`.
///
/// Concatenating the segment texts always reproduces `source` exactly.
/// Each occurrence is its own match segment, even when two are back to back.
///
/// - empty `term`: one plain segment holding all of `source`
/// - empty `source` (non-empty `term`): no segments
/// - no occurrence: one plain segment holding all of `source`
#[must_use]
pub fn segment<'a>(source: &'a str, term: &str, case_sensitive: bool) -> Vec<Segment<'a>> {
    spans(source, term, case_sensitive)
        .iter()
        .map(|span| span.segment(source))
        .collect()
}

/// Same partition as [`segment`], as byte ranges.
#[must_use]
pub fn spans(source: &str, term: &str, case_sensitive: bool) -> Vec<Span> {
    if term.is_empty() {
        return vec![Span {
            start: 0,
            end: source.len(),
            is_match: false,
        }];
    }

    let occurrences = search::find_occurrences(source, term, case_sensitive);
    let mut out = Vec::with_capacity(occurrences.len() * 2 + 1);
    let mut cursor = 0;

    for hit in occurrences {
        if hit.start > cursor {
            out.push(Span {
                start: cursor,
                end: hit.start,
                is_match: false,
            });
        }
        out.push(Span {
            start: hit.start,
            end: hit.end,
            is_match: true,
        });
        cursor = hit.end;
    }

    if cursor < source.len() {
        out.push(Span {
            start: cursor,
            end: source.len(),
            is_match: false,
        });
    }

    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn joined(segments: &[Segment<'_>]) -> String {
        segments.iter().map(|s| s.text).collect()
    }

    proptest! {
        #[test]
        fn coverage(source in "\\PC{0,60}", term in "\\PC{0,4}", cs in any::<bool>()) {
            prop_assert_eq!(joined(&segment(&source, &term, cs)), source);
        }

        #[test]
        fn empty_term(source in "\\PC{0,60}", cs in any::<bool>()) {
            prop_assert_eq!(segment(&source, "", cs), vec![Segment::plain(&source)]);
        }

        #[test]
        fn match_segments_have_term_length(
            source in "[abAB ]{0,40}",
            term in "[abAB]{1,3}",
            cs in any::<bool>(),
        ) {
            for s in segment(&source, &term, cs).iter().filter(|s| s.is_match) {
                prop_assert_eq!(s.text.chars().count(), term.chars().count());
                if cs {
                    prop_assert_eq!(s.text, term.as_str());
                } else {
                    prop_assert_eq!(s.text.to_lowercase(), term.to_lowercase());
                }
            }
        }

        #[test]
        fn plain_segments_never_adjacent_or_empty(
            source in "[ab ]{1,40}",
            term in "[ab]{1,2}",
            cs in any::<bool>(),
        ) {
            let segments = segment(&source, &term, cs);
            for pair in segments.windows(2) {
                prop_assert!(pair[0].is_match || pair[1].is_match);
            }
            for s in &segments {
                prop_assert!(!s.text.is_empty());
            }
        }

        #[test]
        fn no_match_means_single_plain(source in "[a-m]{0,40}", term in "[n-z]{1,3}", cs in any::<bool>()) {
            let segments = segment(&source, &term, cs);
            if source.is_empty() {
                prop_assert!(segments.is_empty());
            } else {
                prop_assert_eq!(segments, vec![Segment::plain(&source)]);
            }
        }

        #[test]
        fn case_fold_matches_lowercased_exact(source in "[a-cA-C ]{0,40}", term in "[a-cA-C]{1,3}") {
            let folded = spans(&source, &term, false);
            let lowered = spans(&source.to_lowercase(), &term.to_lowercase(), true);
            prop_assert_eq!(folded, lowered);
        }
    }
}
