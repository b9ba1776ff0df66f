//! Knowledge base location and naming conventions.

use std::path::PathBuf;

use crate::errors::KnowledgeError;

pub const DEFAULT_EXTENSION: &str = "txt";
pub const DEFAULT_METADATA_FILE: &str = "categories.json";

/// Where FAQ files live and how they are recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeConfig {
    /// Directory scanned for `<category>.<extension>` files.
    pub dir: PathBuf,
    /// File extension without the dot, e.g. `txt`.
    pub extension: String,
    /// Reserved file name holding `{category: description}` JSON.
    pub metadata_file: String,
}

impl KnowledgeConfig {
    /// Config for `dir` with the default extension and metadata file name.
    pub fn new_default(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), KnowledgeError> {
        if self.dir.as_os_str().is_empty() {
            return Err(KnowledgeError::Config("knowledge dir is empty".into()));
        }
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err(KnowledgeError::Config("file extension is empty".into()));
        }
        if self.metadata_file.trim().is_empty() {
            return Err(KnowledgeError::Config("metadata file name is empty".into()));
        }
        Ok(())
    }

    /// Extension normalised without a leading dot.
    pub(crate) fn bare_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}
