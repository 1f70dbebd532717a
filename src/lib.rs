#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,  // file sizes as usize, we target 64-bit
    clippy::module_name_repetitions,   // Rust naming conventions
    clippy::missing_errors_doc,        // internal pub(crate) fns don't need error docs
    clippy::missing_panics_doc,        // same
)]

pub mod cache;
pub mod config;
pub mod error;
pub mod input;
pub mod mcp;
pub mod render;
pub mod repl;
pub(crate) mod search;
pub mod segment;
pub mod session;
pub mod types;

pub use render::{Format, Markers, Style};
pub use segment::{segment, spans};
pub use session::{Event, Session};
pub use types::{Segment, Span};

/// One-shot API: segment `source` for `term` and render it.
#[must_use]
pub fn highlight(
    source: &str,
    term: &str,
    case_sensitive: bool,
    format: Format,
    style: &Style,
) -> String {
    render::render(&segment(source, term, case_sensitive), format, style)
}

/// Package version with the commit it was built from.
#[must_use]
pub fn version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("HIGHLIGHTER_BUILD_COMMIT"),
        ")"
    )
}
