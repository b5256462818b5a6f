//! stable keys for loaded documents
//!
//! A document at `conf/app.yml` is addressed as `app`. Directory names and keys that do not
//! name an existing file are kept as they are.
use crate::loader::Entry;
use indexmap::IndexMap;
use std::path::Path;

pub fn normalize_key(path_or_key: &str) -> String {
    let path = Path::new(path_or_key);
    if !path.is_file() {
        return path_or_key.to_string();
    }

    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_or_key.to_string())
}

/// Key every document of an entry tree by its normalized path, recursively
///
/// Directory keys are kept as they are. Keys colliding after normalization keep the last entry.
pub fn normalize_entries(entry: Entry) -> Entry {
    let Entry::Directory(children) = entry else {
        return entry;
    };

    let mut normalized = IndexMap::with_capacity(children.len());
    for (key, child) in children {
        let (key, child) = match child {
            Entry::Document(path) => (normalize_key(&key), Entry::Document(path)),
            directory => (key, normalize_entries(directory)),
        };

        if let Some(previous) = normalized.insert(key.clone(), child) {
            tracing::warn!(%key, ?previous, "key collision, later entry wins");
        }
    }

    Entry::Directory(normalized)
}
