use std::path::PathBuf;

use thiserror::Error;

/// Failures of the data-preparation stage.
///
/// Per-field parse failures (a bad duration or rating string) are not listed
/// here: they recover locally to an absent value and the record is retained.
#[derive(Debug, Error)]
pub enum DataError {
    /// Source file missing or unreadable. The UI renders an empty state.
    #[error("data file unavailable: {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exists but its structure cannot be read at all.
    #[error(transparent)]
    Malformed(#[from] anyhow::Error),

    /// None of the accepted header names for a required column were found.
    #[error("missing required column '{0}' (no accepted alias present)")]
    MissingColumn(&'static str),

    /// After coercing the year column, zero rows survived.
    #[error("no rows with a parseable release year")]
    NoValidYears,

    /// File extension not handled by any loader.
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}
