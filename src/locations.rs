//! Input normalization for dataset locations.
//!
//! Callers hand the factory anything from nothing at all to a list of mixed
//! local paths and remote identifiers. `Locations` captures the accepted input
//! shapes and flattens them into one ordered list before resolution.

use std::path::{Path, PathBuf};

/// One location, several locations, or no location at all.
///
/// Normalization laws:
/// - absent input yields `[]`
/// - a single value yields a one-element list
/// - a sequence yields the same values in the same order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Locations {
    /// No input was given
    #[default]
    None,
    /// A single location string
    One(String),
    /// An ordered sequence of location strings
    Many(Vec<String>),
}

impl Locations {
    /// Flatten into an ordered list of location strings
    pub fn normalize(self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::One(location) => vec![location],
            Self::Many(locations) => locations,
        }
    }
}

impl From<&str> for Locations {
    fn from(location: &str) -> Self {
        Self::One(location.to_string())
    }
}

impl From<String> for Locations {
    fn from(location: String) -> Self {
        Self::One(location)
    }
}

impl From<&Path> for Locations {
    fn from(location: &Path) -> Self {
        Self::One(location.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for Locations {
    fn from(location: PathBuf) -> Self {
        Self::One(location.to_string_lossy().into_owned())
    }
}

impl From<Vec<String>> for Locations {
    fn from(locations: Vec<String>) -> Self {
        Self::Many(locations)
    }
}

impl From<Vec<&str>> for Locations {
    fn from(locations: Vec<&str>) -> Self {
        Self::Many(locations.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Locations {
    fn from(locations: &[&str]) -> Self {
        Self::Many(locations.iter().map(|l| l.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Locations {
    fn from(locations: [&str; N]) -> Self {
        Self::Many(locations.iter().map(|l| l.to_string()).collect())
    }
}

impl<T: Into<Locations>> From<Option<T>> for Locations {
    fn from(location: Option<T>) -> Self {
        match location {
            Some(value) => value.into(),
            None => Self::None,
        }
    }
}
