use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected run configuration. Reported before any output is produced.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("You cannot use --system and --user at the same time. There's a contradiction.")]
    ConflictingModes,

    #[error("sample count must be greater than 0")]
    ZeroSamples,

    #[error("sample delay must be at least 1 second")]
    ZeroDelay,
}

/// A required OS data source could not be read. Fatal for the run.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed data in {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("{call} failed: {source}")]
    SystemCall {
        call: &'static str,
        #[source]
        source: io::Error,
    },
}

impl CollectionError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CollectionError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CollectionError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn last_os_error(call: &'static str) -> Self {
        CollectionError::SystemCall {
            call,
            source: io::Error::last_os_error(),
        }
    }
}

/// A single CPU percentage could not be derived. Only that sample is lost.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    #[error("division by zero")]
    DivisionByZero,
}

/// Anything that ends a run early.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}
