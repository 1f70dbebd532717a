//! Optional TOML configuration.
//!
//! ```toml
//! case_sensitive = false
//! format = "ansi"
//!
//! [marked]
//! open = "**"
//! close = "**"
//!
//! [ansi]
//! open = "\u001b[1;43m"
//! close = "\u001b[0m"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::HighlightError;
use crate::render::{Format, Markers, Style};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "HIGHLIGHTER_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Initial state of the case-sensitivity toggle.
    pub case_sensitive: bool,
    pub format: Format,
    pub marked: Markers,
    pub ansi: Markers,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            format: Format::default(),
            marked: Markers::marked(),
            ansi: Markers::ansi(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn style(&self) -> Style {
        Style {
            ansi: self.ansi.clone(),
            marked: self.marked.clone(),
        }
    }

    pub fn from_toml(path: &Path, content: &str) -> Result<Self, HighlightError> {
        toml::from_str(content).map_err(|e| HighlightError::Config {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })
    }

    pub fn load_from_path(path: &Path) -> Result<Self, HighlightError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| HighlightError::from_io(path, e))?;
        let config = Self::from_toml(path, &content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// `explicit` path first, then `$HIGHLIGHTER_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, HighlightError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match path {
            Some(p) => Self::load_from_path(&p),
            None => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_defaults() {
        let config = Config::from_toml(Path::new("h.toml"), "").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.case_sensitive);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            Path::new("h.toml"),
            "case_sensitive = true\nformat = \"html\"\n\n[marked]\nopen = \"[\"\nclose = \"]\"\n",
        )
        .unwrap();
        assert!(config.case_sensitive);
        assert_eq!(config.format, Format::Html);
        assert_eq!(config.marked, Markers::new("[", "]"));
        assert_eq!(config.ansi, Markers::ansi());
        assert_eq!(config.style().marked.open, "[");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml(Path::new("h.toml"), "colour = \"red\"").unwrap_err();
        assert!(matches!(err, HighlightError::Config { .. }));
        assert!(err.to_string().contains("h.toml"));
    }

    #[test]
    fn bad_format_is_rejected() {
        assert!(Config::from_toml(Path::new("h.toml"), "format = \"xml\"").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format = \"marked\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.format, Format::Marked);
    }

    #[test]
    fn missing_explicit_file_is_not_found() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, HighlightError::NotFound { .. }));
    }
}
