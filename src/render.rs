use std::fmt;

use serde::Deserialize;

use crate::types::Segment;

/// Output flavour for a rendered segment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `<mark>` around matches, everything HTML-escaped.
    Html,
    /// Terminal escape sequences around matches.
    #[default]
    Ansi,
    /// Configurable plain-text delimiters around matches.
    Marked,
    /// The segment array as JSON.
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Ansi => write!(f, "ansi"),
            Self::Marked => write!(f, "marked"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "ansi" => Ok(Self::Ansi),
            "marked" => Ok(Self::Marked),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format: {other}. Use: html, ansi, marked, json")),
        }
    }
}

/// Opening and closing text placed around each match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Markers {
    pub open: String,
    pub close: String,
}

impl Markers {
    #[must_use]
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Bold black-on-yellow, reset after.
    #[must_use]
    pub fn ansi() -> Self {
        Self::new("\x1b[1;30;43m", "\x1b[0m")
    }

    #[must_use]
    pub fn marked() -> Self {
        Self::new("**", "**")
    }
}

/// Markers for the formats that have configurable delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub ansi: Markers,
    pub marked: Markers,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            ansi: Markers::ansi(),
            marked: Markers::marked(),
        }
    }
}

/// Concatenate segments in order, wrapping each match per `format`.
#[must_use]
pub fn render(segments: &[Segment<'_>], format: Format, style: &Style) -> String {
    match format {
        Format::Html => html(segments),
        Format::Ansi => wrapped(segments, &style.ansi),
        Format::Marked => wrapped(segments, &style.marked),
        Format::Json => serde_json::to_string(segments)
            .expect("segments of &str and bool are always serializable"),
    }
}

fn wrapped(segments: &[Segment<'_>], markers: &Markers) -> String {
    let extra = segments.iter().filter(|s| s.is_match).count()
        * (markers.open.len() + markers.close.len());
    let mut out = String::with_capacity(text_len(segments) + extra);
    for seg in segments {
        if seg.is_match {
            out.push_str(&markers.open);
            out.push_str(seg.text);
            out.push_str(&markers.close);
        } else {
            out.push_str(seg.text);
        }
    }
    out
}

fn html(segments: &[Segment<'_>]) -> String {
    let mut out = String::with_capacity(text_len(segments) + segments.len() * 13);
    for seg in segments {
        if seg.is_match {
            out.push_str("<mark>");
            escape_html(&mut out, seg.text);
            out.push_str("</mark>");
        } else {
            escape_html(&mut out, seg.text);
        }
    }
    out
}

fn text_len(segments: &[Segment<'_>]) -> usize {
    segments.iter().map(|s| s.text.len()).sum()
}

fn escape_html(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}
