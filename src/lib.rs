//! # dataroot - Uniform Dataset File Access
//!
//! A read-only file-access abstraction over datasets that have already been
//! materialized locally, whether the data lives as a plain directory tree, a
//! zip archive, or a tar archive. Consumers get one API - list files, open a
//! file by relative path, read an image - regardless of which physical
//! container holds the data.
//!
//! ## Features
//!
//! - **One surface, four backends**: directory, zip, tar, and an empty
//!   null-object reader behind a single [`Reader`] type
//! - **Location resolution**: [`create_reader`] accepts one or more locations,
//!   delegates anything remote to an external [`Downloader`], deduplicates,
//!   and constructs exactly one reader
//! - **Image helpers**: MIME-driven image listing, bounded decode, and
//!   tabular per-image summaries built on the same two primitives
//! - **Explicit failure modes**: empty input, multiple distinct roots, and
//!   unrecognized formats each fail with their own error variant
//!
//! ## Architecture
//!
//! The library is organized into focused modules:
//!
//! - [`error`] - Centralized error types and handling
//! - [`locations`] - Input normalization for dataset locations
//! - [`reader`] - The reader variants and their shared capability surface
//! - [`factory`] - Location resolution and variant dispatch
//! - [`image`](self::image) - Decoding helpers and the summary row type
//!
//! ## Concurrency
//!
//! All I/O is synchronous and blocking. A reader is immutable after
//! construction, but a single instance is not safe for concurrent use;
//! construct independent readers for parallel work.

// Core modules
pub mod error;
pub mod factory;
pub mod image;
pub mod locations;
pub mod reader;

// Re-export commonly used types for convenience
pub use error::{DatarootError, Result};

// Public API surface for external usage
pub use factory::{create_reader, Downloader, LocalOnly, ReaderFactory};
pub use locations::Locations;
pub use reader::{DirectoryReader, EmptyReader, Reader, TarArchiveReader, ZipArchiveReader};
pub use self::image::{DecodeConfig, ImageInfo};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
