//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for knowledge base loading.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The knowledge directory could not be listed.
    #[error("cannot read knowledge directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),
}
