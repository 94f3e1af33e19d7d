//! Factory for resolving input locations into exactly one reader.
//!
//! The factory normalizes its input, resolves every location to a local
//! filesystem path (delegating anything not already local to the external
//! [`Downloader`]), deduplicates the resolved paths, and selects the reader
//! variant from the physical container found there.
//!
//! # Variant Selection
//! - directory -> [`DirectoryReader`]
//! - `.zip` -> [`ZipArchiveReader`]
//! - `.tar`, `.tgz`, `.gz` -> [`TarArchiveReader`]
//! - nothing resolved -> [`EmptyReader`]
//! - anything else -> `UnsupportedFormat`

use crate::error::{DatarootError, Result};
use crate::locations::Locations;
use crate::reader::{DirectoryReader, EmptyReader, Reader, TarArchiveReader, ZipArchiveReader};
use log::debug;
use std::collections::HashSet;
use std::path::PathBuf;

/// External collaborator that materializes a remote location locally.
///
/// `fetch` performs network retrieval and, when `extract` is set, archive
/// extraction, returning the local path of the result. Implementations own
/// their retry/timeout policy; the factory invokes `fetch` once per location
/// and propagates its failures unchanged.
pub trait Downloader {
    /// Fetch `location`, optionally under a logical dataset `name` used to
    /// pick the local materialization target, and return the local path.
    fn fetch(&self, location: &str, name: Option<&str>, extract: bool) -> Result<PathBuf>;
}

/// Downloader that rejects every location.
///
/// The default collaborator for purely local use: any location that does not
/// already exist on the local filesystem fails with a `Download` error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnly;

impl Downloader for LocalOnly {
    fn fetch(&self, location: &str, _name: Option<&str>, _extract: bool) -> Result<PathBuf> {
        Err(DatarootError::download(format!(
            "no downloader configured for remote location '{location}'"
        )))
    }
}

/// Factory that resolves locations and constructs the matching [`Reader`].
pub struct ReaderFactory {
    downloader: Box<dyn Downloader>,
}

impl ReaderFactory {
    /// Create a factory that resolves remote locations through `downloader`
    pub fn new(downloader: Box<dyn Downloader>) -> Self {
        Self { downloader }
    }

    /// Create a factory for purely local locations
    pub fn local() -> Self {
        Self::new(Box::new(LocalOnly))
    }

    /// Resolve `locations` and construct exactly one reader.
    ///
    /// # Process
    /// 1. Normalize the input into an ordered location list
    /// 2. Resolve each location: an existing local path is used as-is,
    ///    anything else goes through `downloader.fetch(location, name, true)`
    /// 3. Deduplicate the resolved paths
    /// 4. Select the variant: none -> empty, one -> by container, many ->
    ///    `MultiRootUnsupported`
    ///
    /// # Errors
    /// * `Download` (or whatever the collaborator raises) for unresolvable locations
    /// * `MultiRootUnsupported` if more than one distinct root resolves
    /// * `UnsupportedFormat` if the single root is neither a directory nor a
    ///   recognized archive suffix
    /// * `RootNotFound` / `Archive` / `File` from reader construction
    pub fn create(&self, locations: impl Into<Locations>, name: Option<&str>) -> Result<Reader> {
        let locations = locations.into().normalize();

        let mut resolved: HashSet<PathBuf> = HashSet::new();
        for location in locations {
            let path = PathBuf::from(&location);
            if path.exists() {
                resolved.insert(path);
            } else {
                debug!("fetching remote location '{location}'");
                resolved.insert(self.downloader.fetch(&location, name, true)?);
            }
        }

        let mut roots: Vec<PathBuf> = resolved.into_iter().collect();
        if roots.is_empty() {
            return Ok(Reader::Empty(EmptyReader::new()));
        }
        if roots.len() > 1 {
            roots.sort();
            return Err(DatarootError::MultiRootUnsupported { roots });
        }
        Self::dispatch(roots.remove(0))
    }

    /// Select and construct the reader variant for one resolved root
    fn dispatch(root: PathBuf) -> Result<Reader> {
        if root.is_dir() {
            debug!("resolved {} as a directory root", root.display());
            return Ok(Reader::Directory(DirectoryReader::new(root)?));
        }
        let suffix = root
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match suffix.as_deref() {
            Some("zip") => Ok(Reader::ZipArchive(ZipArchiveReader::new(root)?)),
            Some("tar") | Some("tgz") | Some("gz") => {
                Ok(Reader::TarArchive(TarArchiveReader::new(root)?))
            }
            _ => Err(DatarootError::UnsupportedFormat { path: root }),
        }
    }
}

/// Resolve one or more locations into a reader using only local paths.
///
/// Convenience over [`ReaderFactory::local`]; see [`ReaderFactory::create`]
/// for the resolution algorithm and failure modes.
pub fn create_reader(locations: impl Into<Locations>, name: Option<&str>) -> Result<Reader> {
    ReaderFactory::local().create(locations, name)
}
