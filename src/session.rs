use std::sync::Arc;

use tracing::debug;

use crate::cache::SegmentCache;
use crate::config::Config;
use crate::render::{self, Format, Style};
use crate::segment;
use crate::types::{Segment, Span};

/// One change to the widget's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SetSource(String),
    SetTerm(String),
    SetCaseSensitive(bool),
    ToggleCaseSensitive,
}

/// State behind a live highlighting widget: the three inputs plus how to
/// render them. Nothing is derived and stored; every render recomputes from
/// the current inputs.
pub struct Session {
    source: String,
    term: String,
    case_sensitive: bool,
    format: Format,
    style: Style,
    cache: Option<Arc<SegmentCache>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Format::default(), Style::default())
    }
}

impl Session {
    /// Empty source and term, case-insensitive.
    #[must_use]
    pub fn new(format: Format, style: Style) -> Self {
        Session {
            source: String::new(),
            term: String::new(),
            case_sensitive: false,
            format,
            style,
            cache: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::new(config.format, config.style());
        session.case_sensitive = config.case_sensitive;
        session
    }

    /// Route segmentation through a shared memo cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<SegmentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Apply one input change and return the re-rendered output.
    pub fn handle(&mut self, event: Event) -> String {
        match event {
            Event::SetSource(text) => self.source = text,
            Event::SetTerm(term) => self.term = term,
            Event::SetCaseSensitive(on) => self.case_sensitive = on,
            Event::ToggleCaseSensitive => self.case_sensitive = !self.case_sensitive,
        }
        self.render()
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    /// Append to the source text (multi-line entry).
    pub fn append_source(&mut self, text: &str) -> String {
        self.source.push_str(text);
        self.render()
    }

    #[must_use]
    pub fn segments(&self) -> Vec<Segment<'_>> {
        match &self.cache {
            Some(cache) => cache
                .get_or_compute(&self.source, &self.term, self.case_sensitive)
                .iter()
                .map(|span: &Span| span.segment(&self.source))
                .collect(),
            None => segment::segment(&self.source, &self.term, self.case_sensitive),
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let segments = self.segments();
        debug!(
            segments = segments.len(),
            matches = segments.iter().filter(|s| s.is_match).count(),
            case_sensitive = self.case_sensitive,
            "rendered"
        );
        render::render(&segments, self.format, &self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html_session() -> Session {
        Session::new(Format::Html, Style::default())
    }

    #[test]
    fn initial_state_renders_empty() {
        let session = html_session();
        assert_eq!(session.source(), "");
        assert_eq!(session.term(), "");
        assert!(!session.case_sensitive());
        assert_eq!(session.render(), "");
    }

    #[test]
    fn source_change_is_reflected() {
        let mut session = html_session();
        assert_eq!(session.handle(Event::SetSource("hello world".into())), "hello world");
        assert_eq!(session.source(), "hello world");
    }

    #[test]
    fn term_change_highlights() {
        let mut session = html_session();
        session.handle(Event::SetSource("hello world".into()));
        let out = session.handle(Event::SetTerm("o".into()));
        assert!(out.contains("hell<mark>o</mark> w<mark>o</mark>rld"));
    }

    #[test]
    fn case_sensitive_checkbox_flow() {
        let mut session = html_session();
        session.handle(Event::SetSource("Hello world! Hello hellohello".into()));
        session.handle(Event::ToggleCaseSensitive);
        assert!(session.case_sensitive());
        let out = session.handle(Event::SetTerm("Hello".into()));
        assert_eq!(out, "<mark>Hello</mark> world! <mark>Hello</mark> hellohello");
    }

    #[test]
    fn toggle_twice_restores_and_keeps_inputs() {
        let mut session = html_session();
        session.handle(Event::SetSource("Abc".into()));
        session.handle(Event::SetTerm("abc".into()));
        assert_eq!(session.handle(Event::ToggleCaseSensitive), "Abc");
        assert_eq!(session.handle(Event::ToggleCaseSensitive), "<mark>Abc</mark>");
        assert!(!session.case_sensitive());
        assert_eq!(session.source(), "Abc");
        assert_eq!(session.term(), "abc");
    }

    #[test]
    fn explicit_case_setting() {
        let mut session = html_session();
        session.handle(Event::SetCaseSensitive(true));
        session.handle(Event::SetCaseSensitive(true));
        assert!(session.case_sensitive());
        session.handle(Event::SetCaseSensitive(false));
        assert!(!session.case_sensitive());
    }

    #[test]
    fn cached_session_matches_uncached() {
        let cache = Arc::new(SegmentCache::new());
        let mut cached = html_session().with_cache(Arc::clone(&cache));
        let mut plain = html_session();
        for event in [
            Event::SetSource("Hello world! Hello hellohello".into()),
            Event::SetTerm("hello".into()),
            Event::ToggleCaseSensitive,
            Event::ToggleCaseSensitive,
        ] {
            assert_eq!(cached.handle(event.clone()), plain.handle(event));
        }
        assert!(!cache.is_empty());
    }

    #[test]
    fn append_extends_source() {
        let mut session = Session::new(Format::Marked, Style::default());
        session.handle(Event::SetTerm("ab".into()));
        session.handle(Event::SetSource("a".into()));
        assert_eq!(session.append_source("b"), "**ab**");
    }

    #[test]
    fn config_seeds_initial_toggle() {
        let config = Config {
            case_sensitive: true,
            format: Format::Json,
            ..Config::default()
        };
        let session = Session::from_config(&config);
        assert!(session.case_sensitive());
        assert_eq!(session.format(), Format::Json);
    }
}
