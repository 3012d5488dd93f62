//! Error types for table loading and configuration.

use std::io;
use std::path::PathBuf;

/// Failures that stop table construction.
///
/// Per-line format problems are not errors; they are collected as
/// [`FormatIssue`](crate::definitions::FormatIssue)s and loading continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("required definition source not found: {0}")]
    MissingSource(PathBuf),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
