//! Directory-tree reader backend.
//!
//! Serves files straight from a directory root. Listing walks the tree
//! recursively and reports every non-directory entry relative to the root.

use crate::error::{DatarootError, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reader over a plain directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryReader {
    root: PathBuf,
}

impl DirectoryReader {
    /// Create a reader rooted at `root`.
    ///
    /// # Errors
    /// * `RootNotFound` if the root does not exist on the local filesystem
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(DatarootError::RootNotFound { path: root });
        }
        Ok(Self { root })
    }

    /// The directory this reader is bound to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open `root/path` as a binary read stream.
    ///
    /// Accepts exactly the relative path strings produced by [`Self::list_all`].
    pub fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let full = self.root.join(path);
        if !full.is_file() {
            return Err(DatarootError::NotFound {
                root: self.root.clone(),
                path: path.to_string(),
            });
        }
        let file = File::open(&full)
            .map_err(|e| DatarootError::file_error(format!("failed to open {}", full.display()), e))?;
        Ok(Box::new(file))
    }

    /// Recursively list every non-directory entry, relative to the root.
    pub fn list_all(&self) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }
            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(relative) => relative,
                Err(_) => entry.path(),
            };
            entries.push(relative.to_string_lossy().into_owned());
        }
        Ok(entries)
    }
}
