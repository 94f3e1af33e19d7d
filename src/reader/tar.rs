//! Tar-archive reader backend.
//!
//! Tar streams cannot seek to a member, so the reader scans the archive once
//! at construction to build its member index and re-reads from the start of
//! the file on every `open`. Gzip-compressed archives (`.tgz`, `.gz`) are
//! decoded transparently through `flate2`.

use crate::error::{DatarootError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Reader over a `.tar`, `.tgz`, or `.tar.gz` archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarArchiveReader {
    root: PathBuf,
    gzipped: bool,
    members: Vec<String>,
}

impl TarArchiveReader {
    /// Open the archive at `root` and scan its member index.
    ///
    /// Compression is chosen by suffix: `.tgz` and `.gz` decode through gzip,
    /// `.tar` is read as-is.
    ///
    /// # Errors
    /// * `RootNotFound` if the archive file does not exist
    /// * `File` if the archive stream cannot be scanned
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(DatarootError::RootNotFound { path: root });
        }
        let gzipped = matches!(
            root.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .as_deref(),
            Some("tgz") | Some("gz")
        );
        let members = Self::scan_members(&root, gzipped)?;
        Ok(Self {
            root,
            gzipped,
            members,
        })
    }

    /// The archive file this reader is bound to
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn stream(path: &Path, gzipped: bool) -> Result<Box<dyn Read + Send>> {
        let file = File::open(path).map_err(|e| {
            DatarootError::file_error(format!("failed to open archive {}", path.display()), e)
        })?;
        Ok(if gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        })
    }

    fn scan_members(path: &Path, gzipped: bool) -> Result<Vec<String>> {
        let mut archive = tar::Archive::new(Self::stream(path, gzipped)?);
        let mut members = Vec::new();
        for entry in archive.entries().map_err(|e| {
            DatarootError::file_error(format!("failed to scan archive {}", path.display()), e)
        })? {
            let entry = entry.map_err(|e| {
                DatarootError::file_error(format!("failed to scan archive {}", path.display()), e)
            })?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let member = entry
                .path()
                .map_err(|e| {
                    DatarootError::file_error(
                        format!("invalid member path in {}", path.display()),
                        e,
                    )
                })?
                .to_string_lossy()
                .into_owned();
            members.push(member);
        }
        Ok(members)
    }

    /// Open the named member as a binary read stream.
    ///
    /// Re-reads the archive from the start with a fresh decoder and returns
    /// the member fully buffered.
    pub fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        if !self.members.iter().any(|m| m == path) {
            return Err(DatarootError::NotFound {
                root: self.root.clone(),
                path: path.to_string(),
            });
        }
        let mut archive = tar::Archive::new(Self::stream(&self.root, self.gzipped)?);
        for entry in archive.entries().map_err(|e| {
            DatarootError::file_error(format!("failed to scan archive {}", self.root.display()), e)
        })? {
            let mut entry = entry.map_err(|e| {
                DatarootError::file_error(
                    format!("failed to scan archive {}", self.root.display()),
                    e,
                )
            })?;
            let matches = entry
                .path()
                .map(|p| p == Path::new(path))
                .unwrap_or(false);
            if matches {
                let mut buffer = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut buffer).map_err(|e| {
                    DatarootError::file_error(format!("failed to read tar member '{path}'"), e)
                })?;
                return Ok(Box::new(Cursor::new(buffer)));
            }
        }
        // Indexed at construction but gone from the stream now; the archive
        // changed underneath us
        Err(DatarootError::NotFound {
            root: self.root.clone(),
            path: path.to_string(),
        })
    }

    /// List every regular-file member recorded at construction.
    pub fn list_all(&self) -> Result<Vec<String>> {
        Ok(self.members.clone())
    }
}
