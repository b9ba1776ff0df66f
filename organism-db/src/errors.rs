use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrganismDbError>;

#[derive(Debug, Error)]
pub enum OrganismDbError {
    #[error("cannot open organism table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Caller supplied an unusable combination of arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A string did not name a known enum value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}
