//! show command - Display metadata and effective predecessors of units

use std::collections::BTreeSet;

use super::Session;
use crate::cli::args::UnitArgs;
use crate::core::types::{UnitId, UnitMetadata};
use crate::core::view::MetadataView;
use crate::engine::Context;
use crate::ui::output;
use anyhow::Result;
use serde::Serialize;

/// One unit as shown to the user.
#[derive(Serialize)]
struct ShowEntry {
    unit: UnitId,
    #[serde(flatten)]
    metadata: UnitMetadata,
    predecessors: BTreeSet<UnitId>,
}

/// Show each unit of the batch, in lexicographic order.
pub fn show(ctx: &Context, args: &UnitArgs) -> Result<()> {
    let session = Session::open(ctx, args)?;

    let mut view = MetadataView::new(&session.source, session.units.iter().cloned());
    let mut entries = Vec::with_capacity(view.batch().len());
    for unit in view.batch().clone() {
        let metadata = view.get(&unit)?.clone();
        let predecessors = view.predecessors_of(&unit)?;
        entries.push(ShowEntry {
            unit,
            metadata,
            predecessors,
        });
    }

    if session.json() {
        output::json(&entries)?;
        return Ok(());
    }

    let blocks: Vec<String> = entries
        .iter()
        .map(|e| output::format_metadata(&e.unit, &e.metadata, &e.predecessors))
        .collect();
    println!("{}", blocks.join("\n\n"));

    Ok(())
}
