//! Error types for diagram indexing.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors of an index run.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The diagrams directory exists but cannot be enumerated.
    #[error("Cannot enumerate diagrams in {}: {source}", path.display())]
    Enumerate {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// The index document could not be serialized.
    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The index document could not be written.
    #[error("Failed to write index to {}: {source}", path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Why a diagram source was left out of the index.
///
/// None of these abort a run; the builder logs them and moves on.
#[derive(Error, Debug)]
pub enum SkipReason {
    /// The source file could not be read as UTF-8 text.
    #[error("cannot read file: {0}")]
    Unreadable(#[from] std::io::Error),

    /// Neither frontmatter style matched.
    #[error("no frontmatter found")]
    MissingFrontmatter,

    /// The frontmatter is not valid YAML.
    #[error("YAML parse error: {0}")]
    MalformedFrontmatter(serde_yaml::Error),

    /// The frontmatter parsed, but not to a mapping.
    #[error("frontmatter parsed to {0}, expected a mapping")]
    NotMapping(&'static str),
}

/// Configuration errors, raised before any file is touched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `PNG_SCALE` (or `--png-scale`) is not an unsigned integer.
    #[error("Invalid PNG_SCALE value {0:?}: expected an unsigned integer")]
    InvalidPngScale(String),
}
