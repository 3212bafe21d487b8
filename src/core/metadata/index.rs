//! core::metadata::index
//!
//! Precomputed metadata index (fast path).
//!
//! The index is loaded once and answers every read from memory. A unit the
//! index has no entry for is not covered; reading it anyway yields the
//! defaults, the same answer an indexer gives for a unit that declares
//! nothing.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::schema::{parse_index, DeclaredMetadata, IndexDocument, SchemaError};
use super::{MetadataError, MetadataSource};
use crate::core::types::{UnitId, UnitMetadata};

/// Errors from loading or writing an index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read index '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse index '{path}': {source}")]
    Parse { path: PathBuf, source: SchemaError },

    #[error("failed to write index '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize index: {0}")]
    Serialize(String),
}

/// In-memory index of unit metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSource {
    units: BTreeMap<UnitId, UnitMetadata>,
}

impl IndexSource {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(unit, metadata)` pairs.
    ///
    /// Later pairs replace earlier ones for the same unit.
    pub fn from_entries(entries: impl IntoIterator<Item = (UnitId, UnitMetadata)>) -> Self {
        Self {
            units: entries.into_iter().collect(),
        }
    }

    /// Parse an index from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, SchemaError> {
        let doc = parse_index(text)?;
        Ok(Self::from_document(doc))
    }

    /// Load an index file.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Read`] if the file cannot be read and
    /// [`IndexError::Parse`] if it is not a valid index.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let text = fs::read_to_string(path).map_err(|e| IndexError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let index = Self::from_toml(&text).map_err(|e| IndexError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), units = index.len(), "loaded metadata index");
        Ok(index)
    }

    fn from_document(doc: IndexDocument) -> Self {
        Self::from_entries(
            doc.units
                .into_iter()
                .map(|(unit, declared)| (unit, UnitMetadata::from(declared))),
        )
    }

    /// Record metadata for a unit, replacing any previous entry.
    pub fn insert(&mut self, unit: UnitId, metadata: UnitMetadata) {
        self.units.insert(unit, metadata);
    }

    /// Number of indexed units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Indexed units in lexicographic order.
    pub fn units(&self) -> impl Iterator<Item = &UnitId> {
        self.units.keys()
    }

    /// Render the index as a TOML document.
    pub fn to_toml(&self) -> Result<String, IndexError> {
        let units = self
            .units
            .iter()
            .map(|(unit, meta)| (unit.clone(), DeclaredMetadata::from(meta.clone())))
            .collect();

        toml::to_string_pretty(&IndexDocument::new(units))
            .map_err(|e| IndexError::Serialize(e.to_string()))
    }

    /// Write the index atomically.
    ///
    /// Creates parent directories if needed. Writes to a temp file in the
    /// same directory, then renames it over `path`.
    pub fn write(&self, path: &Path) -> Result<(), IndexError> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
        }

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| write_error(&temp_path, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| write_error(&temp_path, e))?;
        file.sync_all().map_err(|e| write_error(&temp_path, e))?;

        fs::rename(&temp_path, path).map_err(|e| write_error(path, e))?;
        Ok(())
    }
}

fn write_error(path: &Path, source: std::io::Error) -> IndexError {
    IndexError::Write {
        path: path.to_path_buf(),
        source,
    }
}

impl MetadataSource for IndexSource {
    fn covers(&self, unit: &UnitId) -> bool {
        self.units.contains_key(unit)
    }

    fn read(&self, unit: &UnitId) -> Result<UnitMetadata, MetadataError> {
        Ok(self.units.get(unit).cloned().unwrap_or_default())
    }
}
