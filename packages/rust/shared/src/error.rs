//! Error types for workfind.
//!
//! Per-source failures carry the source name so that the aggregation step
//! and its logs can say which feed broke. The CLI wraps [`WorkfindError`]
//! with `color-eyre`.

use std::path::PathBuf;

/// Top-level error type for all workfind operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkfindError {
    /// The config file is missing pieces or cannot be parsed.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The shared HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// A source could not be reached or its body could not be read.
    #[error("{site}: fetch failed: {message}")]
    Fetch { site: String, message: String },

    /// A source answered with a non-success status.
    #[error("{site}: HTTP {status}")]
    Status { site: String, status: u16 },

    /// A source's body went past the configured size limit.
    #[error("{site}: response larger than {limit} bytes")]
    TooLarge { site: String, limit: u64 },

    /// A source's body is not a JSON document.
    #[error("{site}: invalid document: {message}")]
    Parse { site: String, message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WorkfindError>;

impl WorkfindError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Transport or body-read failure for `site`.
    pub fn fetch(site: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            site: site.into(),
            message: msg.into(),
        }
    }

    /// Undecodable document from `site`.
    pub fn parse(site: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Parse {
            site: site.into(),
            message: msg.into(),
        }
    }

    /// The source this error belongs to, if any.
    pub fn site(&self) -> Option<&str> {
        match self {
            Self::Fetch { site, .. }
            | Self::Status { site, .. }
            | Self::TooLarge { site, .. }
            | Self::Parse { site, .. } => Some(site),
            Self::Config { .. } | Self::Io { .. } | Self::Client(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_errors_name_their_site() {
        let err = WorkfindError::Status {
            site: "Kitchen".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "Kitchen: HTTP 503");
        assert_eq!(err.site(), Some("Kitchen"));

        let err = WorkfindError::parse("Notebook", "expected value at line 1");
        assert!(err.to_string().starts_with("Notebook: invalid document"));
        assert_eq!(err.site(), Some("Notebook"));
    }

    #[test]
    fn config_errors_have_no_site() {
        let err = WorkfindError::config("no sources configured");
        assert_eq!(err.to_string(), "config error: no sources configured");
        assert_eq!(err.site(), None);
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = WorkfindError::io("/tmp/workfind.toml", source);
        assert!(err.to_string().contains("/tmp/workfind.toml"));
    }
}
