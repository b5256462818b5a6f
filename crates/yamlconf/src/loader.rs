//! discovery of documents on disk
//!
//! A [Loader] turns a path into an [Entry] tree: documents are leaves, directories are
//! mappings keyed by normalized child names. Decoding happens later, see [crate::documents].
use crate::error::Result;
use crate::normalize::normalize_entries;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Document(PathBuf),
    Directory(IndexMap<String, Entry>),
}

impl Entry {
    pub fn empty() -> Self {
        Entry::Directory(Default::default())
    }

    /// Number of direct children (a document counts as one)
    pub fn len(&self) -> usize {
        match self {
            Entry::Document(_) => 1,
            Entry::Directory(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry tree as a value, documents are represented by their path
    pub fn to_value(&self) -> crate::value::Value {
        match self {
            Entry::Document(path) => path.display().to_string().into(),
            Entry::Directory(children) => children
                .iter()
                .map(|(key, child)| (key.clone(), child.to_value()))
                .collect(),
        }
    }
}

pub trait Loader {
    /// Whether `path` is a single document this loader recognizes
    fn is_document(&self, path: &Path) -> bool;

    /// All documents below `path`
    ///
    /// A missing path yields an empty directory. A document path yields that document.
    fn list_entries(&self, path: &Path) -> Result<Entry>;
}

/// Walks the file system, recognizing documents by extension
#[derive(Debug, Clone, derive_new::new)]
pub struct FsLoader {
    extensions: Vec<String>,
}

impl FsLoader {
    pub fn for_extensions(extensions: &[&str]) -> Self {
        Self::new(extensions.iter().map(|ext| ext.to_lowercase()).collect())
    }

    fn has_document_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|known| *known == ext))
    }
}

impl Loader for FsLoader {
    fn is_document(&self, path: &Path) -> bool {
        path.is_file() && self.has_document_extension(path)
    }

    #[tracing::instrument(level = "debug", skip(self), fields(path = %path.display()))]
    fn list_entries(&self, path: &Path) -> Result<Entry> {
        Ok(normalize_entries(self.walk(path)?))
    }
}

impl FsLoader {
    /// Entry tree keyed by the document paths as found on disk
    fn walk(&self, path: &Path) -> Result<Entry> {
        if !path.exists() {
            tracing::debug!(path=%path.display(), "path does not exist");
            return Ok(Entry::empty());
        }

        if self.is_document(path) {
            return Ok(Entry::Document(path.to_path_buf()));
        }

        if !path.is_dir() {
            return Ok(Entry::empty());
        }

        let mut children: Vec<PathBuf> = std::fs::read_dir(path)?
            .map(|dir_entry| dir_entry.map(|dir_entry| dir_entry.path()))
            .collect::<std::io::Result<_>>()?;
        children.sort();

        let mut entries = IndexMap::new();
        for child in children {
            if child.is_dir() {
                let name = child
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                entries.insert(name, self.walk(&child)?);
            } else if self.is_document(&child) {
                entries.insert(child.to_string_lossy().into_owned(), Entry::Document(child));
            } else {
                tracing::trace!(path=%child.display(), "skipping non-document");
            }
        }

        Ok(Entry::Directory(entries))
    }
}
