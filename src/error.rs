//! Fatal error taxonomy for a generation run.
//!
//! Recoverable conditions (a function without a page, a missing help
//! sentence, an unresolvable asset) never reach this type: they are logged
//! as warnings and degrade a single entry.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for site generation.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A qualified function name could not be split into path segments.
    #[error("invalid function name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manual converter could not be started or exited with 127.
    #[error("manual converter '{program}' not found")]
    ToolNotFound { program: String },

    #[error("failed to run manual converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("manual converter '{program}' failed with exit code {code}")]
    ConverterFailed { program: String, code: i32 },

    #[error("unable to determine the root of the HTML manual in {}", dir.display())]
    ManualRoot { dir: PathBuf },

    /// Two functions mapped to the same alphabetical index entry.
    #[error("alphabetical index collision at '{key}'")]
    IndexCollision { key: String },

    #[error("invalid options: {0}")]
    Config(String),

    #[error("invalid package descriptor: {0}")]
    Descriptor(String),

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The page renderer or summary extractor failed for a reason other
    /// than a missing or undocumented function.
    #[error("failed to document '{name}': {message}")]
    Render { name: String, message: String },
}

impl Error {
    pub(crate) fn invalid_name(name: &str, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason,
        }
    }
}
