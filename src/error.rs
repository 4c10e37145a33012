//! Error types for the compatdex build
//!
//! Only fatal conditions live here. A document that is merely unusable is not
//! an error: it is reported through [`crate::core::SkipReason`] and the run
//! continues.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all build operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// I/O errors on a known file
    #[error("I/O error on {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content root or another required input is missing
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A JSON input (dataset or package descriptor) failed to parse
    #[error("Malformed JSON in {}: {source}", path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON input parsed but has the wrong top-level shape
    #[error("Unexpected shape in {}: {reason}", path.display())]
    UnexpectedShape { path: PathBuf, reason: String },

    /// Serializing the output failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Include or ignore glob could not be compiled
    #[error("Invalid glob pattern `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Directory traversal failed
    #[error("Error traversing {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A record could not be placed into the output tree
    #[error("Cannot merge record at `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    /// Wrap an I/O error with the file it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound { path };
        }
        Self::FileIo { path, source }
    }

    /// Create a new malformed JSON error
    pub fn malformed_json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::MalformedJson {
            path: path.into(),
            source,
        }
    }

    /// Create a new unexpected shape error
    pub fn unexpected_shape(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid glob error
    pub fn invalid_glob(pattern: impl Into<String>, source: glob::PatternError) -> Self {
        Self::InvalidGlob {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a new invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_promoted() {
        let err = BuildError::io(
            "missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, BuildError::FileNotFound { .. }));
    }

    #[test]
    fn test_other_io_keeps_path() {
        let err = BuildError::io(
            "locked.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        match err {
            BuildError::FileIo { path, .. } => assert_eq!(path, PathBuf::from("locked.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display_mentions_path() {
        let err = BuildError::invalid_path("", "empty path");
        assert_eq!(err.to_string(), "Cannot merge record at ``: empty path");
    }
}
