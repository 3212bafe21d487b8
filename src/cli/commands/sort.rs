//! sort command - Print units in activation order

use super::Session;
use crate::cli::args::UnitArgs;
use crate::core::sort::PrioritySorter;
use crate::core::types::UnitId;
use crate::engine::Context;
use crate::ui::output;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct SortOutput<'a> {
    order: &'a [UnitId],
}

/// Sort the batch and print one unit per line.
///
/// The order is printed even in quiet mode; it is the command's result.
pub fn sort(ctx: &Context, args: &UnitArgs) -> Result<()> {
    let session = Session::open(ctx, args)?;

    let order = PrioritySorter::new(&session.source).sort(session.units.iter().cloned())?;

    if session.json() {
        output::json(&SortOutput { order: &order })?;
    } else {
        println!("{}", output::format_list(&order, ""));
    }

    Ok(())
}
