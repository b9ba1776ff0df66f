//! Directory scanning for FAQ files and the optional metadata file.

use std::{collections::HashMap, fs, path::PathBuf};

use tracing::{debug, warn};

use crate::{config::KnowledgeConfig, errors::KnowledgeError};

/// Lists `<category>.<ext>` files under `cfg.dir`, sorted by file name.
///
/// The metadata file is never returned even if it shares the extension.
///
/// # Errors
/// `KnowledgeError::Directory` if the directory cannot be listed.
pub fn discover_files(cfg: &KnowledgeConfig) -> Result<Vec<(String, PathBuf)>, KnowledgeError> {
    let read_dir = fs::read_dir(&cfg.dir).map_err(|source| KnowledgeError::Directory {
        path: cfg.dir.clone(),
        source,
    })?;

    let ext = cfg.bare_extension();
    let mut found = Vec::new();

    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        if file_name.to_string_lossy() == cfg.metadata_file {
            continue;
        }

        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if !matches_ext {
            debug!(file = %path.display(), "ignoring file with foreign extension");
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!(file = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        if stem.is_empty() {
            continue;
        }
        found.push((stem.to_string(), path));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}

/// Reads `{category: description}` from the metadata file.
///
/// Absent file yields an empty map; an unreadable or malformed file is
/// logged and also yields an empty map.
pub fn load_descriptions(cfg: &KnowledgeConfig) -> HashMap<String, String> {
    let path = cfg.dir.join(&cfg.metadata_file);
    if !path.is_file() {
        return HashMap::new();
    }

    let raw = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "cannot read category metadata");
            return HashMap::new();
        }
    };

    match serde_json::from_str::<HashMap<String, String>>(&raw) {
        Ok(map) => map,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "malformed category metadata, ignoring");
            HashMap::new()
        }
    }
}
