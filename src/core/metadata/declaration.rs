//! core::metadata::declaration
//!
//! Per-unit declaration files read on demand (slow path).
//!
//! # Layout
//!
//! A declaration directory holds one TOML file per unit, named
//! `<unit>.toml`:
//!
//! ```toml
//! order = -10
//! before = ["com.example.JacksonConfig"]
//! after = ["com.example.ServletConfig"]
//! ```
//!
//! Every field is optional. A unit without a declaration file cannot be
//! ordered and is reported as unreadable.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::schema::parse_declaration;
use super::{IndexSource, MetadataError, MetadataSource};
use crate::core::types::{UnitId, UnitMetadata};

/// File extension of declaration files.
pub const DECLARATION_EXTENSION: &str = "toml";

/// Reads unit declarations from a directory.
#[derive(Debug, Clone)]
pub struct DeclarationSource {
    dir: PathBuf,
}

impl DeclarationSource {
    /// Create a source reading from `dir`.
    ///
    /// The directory is not touched until a unit is read.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The declaration directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the declaration file for `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Unreadable`] if the unit id cannot be used
    /// as a file name.
    pub fn path_for(&self, unit: &UnitId) -> Result<PathBuf, MetadataError> {
        let name = unit.as_str();
        if name.contains(['/', '\\']) {
            return Err(MetadataError::unreadable(
                unit,
                "unit id contains a path separator",
            ));
        }
        if name.starts_with('.') {
            return Err(MetadataError::unreadable(unit, "unit id starts with '.'"));
        }
        if name.contains(char::is_control) {
            return Err(MetadataError::unreadable(
                unit,
                "unit id contains control characters",
            ));
        }

        Ok(self
            .dir
            .join(format!("{name}.{DECLARATION_EXTENSION}")))
    }

    /// List every unit with a declaration file, in lexicographic order.
    ///
    /// Files whose stem is not a valid unit id are skipped.
    pub fn discover(&self) -> Result<Vec<UnitId>, MetadataError> {
        let scan_err = |e: std::io::Error| MetadataError::Scan {
            path: self.dir.clone(),
            reason: e.to_string(),
        };

        let mut units = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(scan_err)? {
            let path = entry.map_err(scan_err)?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(DECLARATION_EXTENSION)
            {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match UnitId::new(stem) {
                Ok(unit) if self.path_for(&unit).is_ok() => units.push(unit),
                _ => trace!(path = %path.display(), "skipping file with invalid unit name"),
            }
        }

        units.sort();
        Ok(units)
    }

    /// Read every declaration into a precomputed index.
    ///
    /// Fails on the first unreadable declaration.
    pub fn build_index(&self) -> Result<IndexSource, MetadataError> {
        let mut index = IndexSource::new();
        for unit in self.discover()? {
            let metadata = self.read(&unit)?;
            index.insert(unit, metadata);
        }
        Ok(index)
    }
}

impl MetadataSource for DeclarationSource {
    fn read(&self, unit: &UnitId) -> Result<UnitMetadata, MetadataError> {
        let path = self.path_for(unit)?;
        trace!(unit = %unit, path = %path.display(), "reading declaration");

        let text = fs::read_to_string(&path).map_err(|e| {
            MetadataError::unreadable(unit, format!("failed to read '{}': {e}", path.display()))
        })?;

        let declared = parse_declaration(&text).map_err(|e| {
            MetadataError::unreadable(
                unit,
                format!("malformed declaration '{}': {e}", path.display()),
            )
        })?;

        Ok(declared.into())
    }
}
