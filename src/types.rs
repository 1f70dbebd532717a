use serde::Serialize;

/// A contiguous run of source text, either unmatched or one occurrence of the
/// search term. Borrows from the source so segmenting never copies text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment<'a> {
    pub text: &'a str,
    pub is_match: bool,
}

impl<'a> Segment<'a> {
    #[must_use]
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            is_match: false,
        }
    }

    #[must_use]
    pub fn matched(text: &'a str) -> Self {
        Self {
            text,
            is_match: true,
        }
    }
}

/// Byte range form of a [`Segment`]. Owned and `Copy`, so it can live in the
/// cache independently of the source string it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub is_match: bool,
}

impl Span {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Resolve against the source the span was computed from.
    /// Panics if `source` is not that string (offsets out of range).
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    #[must_use]
    pub fn segment<'a>(&self, source: &'a str) -> Segment<'a> {
        Segment {
            text: self.text(source),
            is_match: self.is_match,
        }
    }
}
