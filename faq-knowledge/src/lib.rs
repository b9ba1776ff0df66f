//! FAQ knowledge base keyed by category.
//!
//! Categories are discovered from a directory of `<category>.<ext>` text
//! files plus an optional `categories.json` with human-readable descriptions.
//! The store is loaded once and is read-only afterwards, so it can be shared
//! behind an `Arc` without locking.

mod config;
mod discovery;
mod errors;

pub use config::{DEFAULT_EXTENSION, DEFAULT_METADATA_FILE, KnowledgeConfig};
pub use errors::KnowledgeError;

use std::collections::HashMap;

use tracing::{info, warn};

/// One FAQ category and its text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeEntry {
    pub category: String,
    pub content: String,
}

/// Immutable in-memory FAQ store.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeStore {
    entries: Vec<KnowledgeEntry>,
    index: HashMap<String, usize>,
    descriptions: HashMap<String, String>,
}

impl KnowledgeStore {
    /// Scans `cfg.dir` and loads every FAQ file.
    ///
    /// Individual files that cannot be read as UTF-8 text are skipped with a
    /// warning. An empty directory produces a valid, empty store.
    ///
    /// # Errors
    /// - `KnowledgeError::Config` for invalid config values
    /// - `KnowledgeError::Directory` if the directory is unreadable
    pub fn load(cfg: &KnowledgeConfig) -> Result<Self, KnowledgeError> {
        cfg.validate()?;

        let files = discovery::discover_files(cfg)?;
        let descriptions = discovery::load_descriptions(cfg);

        let mut store = Self {
            descriptions,
            ..Self::default()
        };

        for (category, path) in files {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    info!(%category, bytes = content.len(), "loaded FAQ category");
                    store.push(category, content);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable FAQ file");
                }
            }
        }

        if store.is_empty() {
            warn!(dir = %cfg.dir.display(), "knowledge base is empty");
        }

        Ok(store)
    }

    /// Builds a store from in-memory entries, keeping their order.
    ///
    /// Later duplicates of a category are ignored.
    pub fn from_entries<I, C, T>(entries: I, descriptions: HashMap<String, String>) -> Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
        T: Into<String>,
    {
        let mut store = Self {
            descriptions,
            ..Self::default()
        };
        for (category, content) in entries {
            store.push(category.into(), content.into());
        }
        store
    }

    /// Stored text for `category`, or `""` when absent.
    pub fn get_content(&self, category: &str) -> &str {
        self.index
            .get(category)
            .map(|&i| self.entries[i].content.as_str())
            .unwrap_or("")
    }

    /// Whether `category` was discovered.
    pub fn is_valid(&self, category: &str) -> bool {
        self.index.contains_key(category)
    }

    /// Categories in discovery order.
    pub fn available_categories(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.category.as_str()).collect()
    }

    /// Metadata description of `category`, or `"<category> related questions"`.
    pub fn describe(&self, category: &str) -> String {
        match self.descriptions.get(category) {
            Some(d) if !d.trim().is_empty() => d.clone(),
            _ => format!("{category} related questions"),
        }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, category: String, content: String) {
        if self.index.contains_key(&category) {
            return;
        }
        self.index.insert(category.clone(), self.entries.len());
        self.entries.push(KnowledgeEntry { category, content });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &std::path::Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn loads_categories_and_skips_foreign_files() {
        let dir = tempdir().unwrap();
        write(dir.path(), "sales.txt", "Prices start at 100.");
        write(dir.path(), "labs.txt", "Samples ship on dry ice.");
        write(dir.path(), "notes.md", "not a FAQ");
        write(dir.path(), "categories.json", r#"{"sales": "pricing, contracts"}"#);

        let store = KnowledgeStore::load(&KnowledgeConfig::new_default(dir.path())).unwrap();

        assert_eq!(store.available_categories(), vec!["labs", "sales"]);
        assert_eq!(store.get_content("sales"), "Prices start at 100.");
        assert!(store.is_valid("labs"));
        assert!(!store.is_valid("notes"));
        assert_eq!(store.describe("sales"), "pricing, contracts");
        assert_eq!(store.describe("labs"), "labs related questions");
    }

    #[test]
    fn missing_category_yields_empty_content() {
        let store = KnowledgeStore::from_entries([("sales", "x")], HashMap::new());
        assert_eq!(store.get_content("reports"), "");
        assert!(!store.is_valid("reports"));
    }

    #[test]
    fn metadata_file_is_never_a_category() {
        let dir = tempdir().unwrap();
        write(dir.path(), "categories.json", r#"{"a": "b"}"#);
        write(dir.path(), "reports.json", "Reports arrive as PDF.");
        let cfg = KnowledgeConfig {
            extension: "json".into(),
            ..KnowledgeConfig::new_default(dir.path())
        };

        let store = KnowledgeStore::load(&cfg).unwrap();
        assert_eq!(store.available_categories(), vec!["reports"]);
    }

    #[test]
    fn empty_directory_is_valid() {
        let dir = tempdir().unwrap();
        let store = KnowledgeStore::load(&KnowledgeConfig::new_default(dir.path())).unwrap();
        assert!(store.is_empty());
        assert!(store.available_categories().is_empty());
    }

    #[test]
    fn unreadable_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = KnowledgeStore::load(&KnowledgeConfig::new_default(missing)).unwrap_err();
        assert!(matches!(err, KnowledgeError::Directory { .. }));
    }

    #[test]
    fn malformed_metadata_falls_back_to_generated_descriptions() {
        let dir = tempdir().unwrap();
        write(dir.path(), "sales.txt", "x");
        write(dir.path(), "categories.json", "{not json");
        let store = KnowledgeStore::load(&KnowledgeConfig::new_default(dir.path())).unwrap();
        assert_eq!(store.describe("sales"), "sales related questions");
    }

    #[test]
    fn from_entries_keeps_order_and_first_duplicate() {
        let store = KnowledgeStore::from_entries(
            [("sales", "one"), ("labs", "two"), ("sales", "three")],
            HashMap::new(),
        );
        assert_eq!(store.available_categories(), vec!["sales", "labs"]);
        assert_eq!(store.get_content("sales"), "one");
        assert_eq!(store.len(), 2);
    }
}
