//! engine::source
//!
//! Metadata source selection.
//!
//! | index | declarations | source                                   |
//! |-------|--------------|------------------------------------------|
//! | yes   | yes          | index, falling back to declarations      |
//! | yes   | no           | index only                               |
//! | no    | yes          | declarations only                        |
//! | no    | no           | error                                    |
//!
//! The selected source is wrapped in a [`CachedSource`] so commands that
//! read the same batch twice (such as `check`) hit the disk once per unit.

use tracing::debug;

use super::{EngineError, Settings};
use crate::core::metadata::{
    CachedSource, DeclarationSource, IndexSource, LayeredSource, MetadataSource,
};

/// A metadata source chosen at runtime.
pub type DynSource = CachedSource<Box<dyn MetadataSource>>;

/// Open the metadata source described by `settings`.
///
/// # Errors
///
/// - [`EngineError::NoSource`] if neither an index nor declarations are configured
/// - [`EngineError::Index`] if the index cannot be loaded
pub fn open_source(settings: &Settings) -> Result<DynSource, EngineError> {
    let source: Box<dyn MetadataSource> = match (&settings.index, &settings.declarations) {
        (Some(index), Some(declarations)) => {
            debug!(index = %index.display(), declarations = %declarations.display(), "using layered source");
            Box::new(LayeredSource::new(
                IndexSource::load(index)?,
                DeclarationSource::new(declarations),
            ))
        }
        (Some(index), None) => {
            debug!(index = %index.display(), "using index source");
            Box::new(IndexSource::load(index)?)
        }
        (None, Some(declarations)) => {
            debug!(declarations = %declarations.display(), "using declaration source");
            Box::new(DeclarationSource::new(declarations))
        }
        (None, None) => return Err(EngineError::NoSource),
    };

    Ok(CachedSource::new(source))
}
