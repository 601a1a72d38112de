// CollectionCatalog — ordinal -> collection name lookup
//
// Collections are the subdirectories of a split directory:
//
//   root/test_data/
//     bored-apes/
//     cool-cats/
//     .DS_Store        <- skipped
//     notes.txt        <- skipped
//
// Names are sorted so ordinals stay the same from one run to the next.
// The catalog never changes after construction and can be shared freely.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Read-only list of collection names addressed by ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionCatalog {
    names: Vec<String>,
}

impl CollectionCatalog {
    /// List the collection directories under `dir`.
    ///
    /// Hidden entries (names starting with `.`) and plain files are left out
    /// of the catalog and of its count.
    pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!(path = %path.display(), "skipping entry with non-UTF-8 name");
                continue;
            };
            if name.starts_with('.') || !path.is_dir() {
                debug!(entry = name, "skipping non-collection entry");
                continue;
            }
            names.push(name.to_string());
        }
        Ok(Self::from_names(names))
    }

    /// Build a catalog from an explicit list of names (sorted on entry).
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        Self { names }
    }

    /// Number of collections.
    pub fn count(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of the collection at `ordinal`.
    pub fn name_of(&self, ordinal: usize) -> Result<&str> {
        self.names
            .get(ordinal)
            .map(String::as_str)
            .ok_or(Error::CatalogOutOfRange {
                ordinal,
                count: self.names.len(),
            })
    }

    /// All names in ordinal order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
