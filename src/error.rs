use std::path::PathBuf;

/// Every error the outer surfaces can produce. Segmenting itself never fails;
/// these come from reading input and loading configuration.
#[derive(Debug)]
pub enum HighlightError {
    NotFound {
        path: PathBuf,
    },
    PermissionDenied {
        path: PathBuf,
    },
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidUtf8 {
        path: PathBuf,
    },
    Config {
        path: PathBuf,
        reason: String,
    },
}

impl std::fmt::Display for HighlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "not found: {}", path.display()),
            Self::PermissionDenied { path } => {
                write!(f, "{} [permission denied]", path.display())
            }
            Self::IoError { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
            Self::InvalidUtf8 { path } => {
                write!(f, "{}: not valid UTF-8 text", path.display())
            }
            Self::Config { path, reason } => {
                write!(f, "config error in {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for HighlightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl HighlightError {
    /// Classify an I/O failure on `path`.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, e: std::io::Error) -> Self {
        let path = path.into();
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::InvalidData => Self::InvalidUtf8 { path },
            _ => Self::IoError { path, source: e },
        }
    }

    /// Process exit code for the CLI.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::IoError { .. } => 2,
            Self::InvalidUtf8 { .. } | Self::Config { .. } => 3,
            Self::PermissionDenied { .. } => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn io_errors_are_classified() {
        let nf = HighlightError::from_io("a.txt", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(nf, HighlightError::NotFound { .. }));
        assert_eq!(nf.exit_code(), 2);

        let pd = HighlightError::from_io("a.txt", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(pd.exit_code(), 4);
        assert_eq!(pd.to_string(), "a.txt [permission denied]");

        let bad = HighlightError::from_io("-", io::Error::from(io::ErrorKind::InvalidData));
        assert!(matches!(bad, HighlightError::InvalidUtf8 { .. }));
        assert_eq!(bad.exit_code(), 3);

        let other = HighlightError::from_io("a.txt", io::Error::other("boom"));
        assert_eq!(other.to_string(), "a.txt: boom");
        assert!(std::error::Error::source(&other).is_some());
    }

    #[test]
    fn config_error_message() {
        let e = HighlightError::Config {
            path: PathBuf::from("h.toml"),
            reason: "unknown field `colour`".into(),
        };
        assert_eq!(e.to_string(), "config error in h.toml: unknown field `colour`");
        assert_eq!(e.exit_code(), 3);
    }
}
