//! Zip-archive reader backend.
//!
//! Opens the archive once at construction and holds its member index for the
//! reader's lifetime. Member access through the `zip` crate requires `&mut`,
//! so the index sits behind a mutex; the lock serializes whole calls but does
//! not make one reader safe for concurrent streaming. Callers that want
//! parallelism should construct independent readers.

use crate::error::{DatarootError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Reader over a `.zip` archive.
pub struct ZipArchiveReader {
    root: PathBuf,
    archive: Mutex<ZipArchive<File>>,
}

impl ZipArchiveReader {
    /// Open the archive at `root` in read mode and build its member index.
    ///
    /// # Errors
    /// * `RootNotFound` if the archive file does not exist
    /// * `Archive` if the zip central directory cannot be read
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(DatarootError::RootNotFound { path: root });
        }
        let file = File::open(&root).map_err(|e| {
            DatarootError::file_error(format!("failed to open archive {}", root.display()), e)
        })?;
        let archive = ZipArchive::new(file).map_err(|e| {
            DatarootError::archive(format!("failed to read zip index of {}: {e}", root.display()))
        })?;
        Ok(Self {
            root,
            archive: Mutex::new(archive),
        })
    }

    /// The archive file this reader is bound to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open the named member as a binary read stream.
    ///
    /// The member is decompressed fully before returning, so the stream does
    /// not borrow the shared archive handle.
    pub fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let mut archive = self.archive.lock();
        let mut member = match archive.by_name(path) {
            Ok(member) => member,
            Err(ZipError::FileNotFound) => {
                return Err(DatarootError::NotFound {
                    root: self.root.clone(),
                    path: path.to_string(),
                })
            }
            Err(e) => {
                return Err(DatarootError::archive(format!(
                    "failed to open zip member '{path}': {e}"
                )))
            }
        };
        let mut buffer = Vec::with_capacity(member.size() as usize);
        member.read_to_end(&mut buffer).map_err(|e| {
            DatarootError::file_error(format!("failed to read zip member '{path}'"), e)
        })?;
        Ok(Box::new(Cursor::new(buffer)))
    }

    /// List every non-directory member, excluding `__MACOSX` resource forks.
    pub fn list_all(&self) -> Result<Vec<String>> {
        let mut archive = self.archive.lock();
        let mut members = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let member = archive.by_index(index).map_err(|e| {
                DatarootError::archive(format!("failed to read zip member index {index}: {e}"))
            })?;
            if member.is_dir() {
                continue;
            }
            let name = member.name();
            if name.contains("__MACOSX") {
                continue;
            }
            members.push(name.to_string());
        }
        Ok(members)
    }
}

impl fmt::Debug for ZipArchiveReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipArchiveReader")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
