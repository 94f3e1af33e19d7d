//! Uniform read-only file access over one resolved dataset root.
//!
//! This module defines the [`Reader`] capability surface shared by every
//! backend: list files, open a file by relative path, and the image helpers
//! built on top of those two. The set of backends is closed, so `Reader` is a
//! tagged enum rather than an open trait hierarchy; each variant wraps the
//! concrete reader that owns the root and any archive handle.
//!
//! Readers are immutable after construction. Archive handles are released
//! when the reader is dropped. A single reader instance is not safe for
//! concurrent use; construct one reader per worker instead.

pub mod directory;
pub mod empty;
pub mod tar;
pub mod zip;

pub use directory::DirectoryReader;
pub use empty::EmptyReader;
pub use tar::TarArchiveReader;
pub use zip::ZipArchiveReader;

use crate::error::{DatarootError, Result};
use crate::image::{DecodeConfig, ImageInfo};
use image::RgbImage;
use log::warn;
use std::io::Read;
use std::path::Path;

/// The polymorphic read-only file-access abstraction over one dataset root.
///
/// Constructed by [`crate::create_reader`] / [`crate::ReaderFactory`]; the
/// variant is chosen there from the physical container holding the data.
#[derive(Debug)]
pub enum Reader {
    /// A plain directory tree
    Directory(DirectoryReader),
    /// A `.zip` archive
    ZipArchive(ZipArchiveReader),
    /// A `.tar`/`.tgz`/`.tar.gz` archive
    TarArchive(TarArchiveReader),
    /// No data resolved
    Empty(EmptyReader),
}

impl Reader {
    /// Human-readable variant tag, used in logs and comparison errors
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Directory(_) => "directory",
            Self::ZipArchive(_) => "zip archive",
            Self::TarArchive(_) => "tar archive",
            Self::Empty(_) => "empty",
        }
    }

    /// The local root this reader is bound to; `None` for the empty reader
    pub fn root(&self) -> Option<&Path> {
        match self {
            Self::Directory(reader) => Some(reader.root()),
            Self::ZipArchive(reader) => Some(reader.root()),
            Self::TarArchive(reader) => Some(reader.root()),
            Self::Empty(_) => None,
        }
    }

    /// Open a file by the exact relative path `list_all` reports for it.
    ///
    /// # Errors
    /// * `NotFound` if the path is absent from the backing store
    /// * `EmptyReader` if this reader holds no data
    pub fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        match self {
            Self::Directory(reader) => reader.open(path),
            Self::ZipArchive(reader) => reader.open(path),
            Self::TarArchive(reader) => reader.open(path),
            Self::Empty(reader) => reader.open(path),
        }
    }

    /// List every leaf entry under the root, relative to the root.
    ///
    /// Directory-only entries never appear; zip listings additionally drop
    /// `__MACOSX` resource forks. Order is unspecified.
    pub fn list_all(&self) -> Result<Vec<String>> {
        match self {
            Self::Directory(reader) => reader.list_all(),
            Self::ZipArchive(reader) => reader.list_all(),
            Self::TarArchive(reader) => reader.list_all(),
            Self::Empty(reader) => reader.list_all(),
        }
    }

    /// List entries filtered by extension and subfolder prefix.
    ///
    /// `extensions` keeps entries whose lowercase suffix (leading dot
    /// included, e.g. `".csv"`) is in the set; `subfolders` keeps entries
    /// whose path starts with one of the given prefixes. Both filters compose
    /// with AND semantics and an empty slice means "no filter".
    pub fn list_files(&self, extensions: &[&str], subfolders: &[&str]) -> Result<Vec<String>> {
        let extensions: Vec<String> = extensions
            .iter()
            .map(|e| e.to_ascii_lowercase())
            .collect();
        let entries = self.list_all()?;
        Ok(entries
            .into_iter()
            .filter(|entry| {
                matches_extension(entry, &extensions) && matches_subfolder(entry, subfolders)
            })
            .collect())
    }

    /// List entries whose extension the MIME registry maps to `image/*`.
    pub fn list_images(&self, subfolders: &[&str]) -> Result<Vec<String>> {
        Ok(self
            .list_files(&[], subfolders)?
            .into_iter()
            .filter(|entry| crate::image::is_image_path(entry))
            .collect())
    }

    /// Read and decode an image into 3-channel RGB.
    ///
    /// When either bound is given, the decode is downscaled to approximately
    /// `(width/ratio, height/ratio)` with `ratio = max(width/max_width,
    /// height/max_height)` over the supplied bounds. The resize is a
    /// performance hint, never an upscale.
    pub fn read_image(
        &self,
        path: &str,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> Result<RgbImage> {
        let bytes = self.read_bytes(path)?;
        crate::image::decode_scaled(path, &bytes, max_width, max_height)
    }

    /// Summarize images into one row per path with the default tolerant
    /// decode config. See [`Reader::get_image_info_with`].
    pub fn get_image_info<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<ImageInfo>> {
        self.get_image_info_with(paths, &DecodeConfig::default())
    }

    /// Summarize images into `{file_path, size_kb, width, height}` rows.
    ///
    /// Read failures always propagate. Decode failures are governed by
    /// `config`: tolerant (the default) skips the row with a warning, strict
    /// propagates the first failure.
    pub fn get_image_info_with<S: AsRef<str>>(
        &self,
        paths: &[S],
        config: &DecodeConfig,
    ) -> Result<Vec<ImageInfo>> {
        let mut rows = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let bytes = self.read_bytes(path)?;
            match crate::image::info_row(path, &bytes) {
                Ok(row) => rows.push(row),
                Err(err) if config.tolerate_truncated => {
                    warn!("skipping undecodable image '{path}': {err}");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(rows)
    }

    /// Variant-aware equality.
    ///
    /// Two readers are equal iff they are the same variant and their roots
    /// are equal (path equality, not content equality); two empty readers are
    /// always equal. Comparing across different variants is an unsupported
    /// operation and fails rather than returning `false`.
    pub fn try_eq(&self, other: &Reader) -> Result<bool> {
        match (self, other) {
            (Self::Directory(a), Self::Directory(b)) => Ok(a.root() == b.root()),
            (Self::ZipArchive(a), Self::ZipArchive(b)) => Ok(a.root() == b.root()),
            (Self::TarArchive(a), Self::TarArchive(b)) => Ok(a.root() == b.root()),
            (Self::Empty(_), Self::Empty(_)) => Ok(true),
            _ => Err(DatarootError::ComparisonUnsupported {
                left: self.variant_name(),
                right: other.variant_name(),
            }),
        }
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let mut stream = self.open(path)?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).map_err(|e| {
            DatarootError::file_error(format!("failed to read '{path}'"), e)
        })?;
        Ok(bytes)
    }
}

fn matches_extension(entry: &str, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    match Path::new(entry).extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|wanted| *wanted == format!(".{}", ext.to_ascii_lowercase())),
        None => false,
    }
}

fn matches_subfolder(entry: &str, subfolders: &[&str]) -> bool {
    if subfolders.is_empty() {
        return true;
    }
    subfolders.iter().any(|prefix| entry.starts_with(prefix))
}
