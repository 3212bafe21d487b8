//! check command - Report cycles and references outside the batch
//!
//! Exits non-zero when the batch cannot be ordered. Out-of-batch
//! references are reported but never fail the check.

use super::Session;
use crate::cli::args::UnitArgs;
use crate::core::check::check as check_batch;
use crate::engine::Context;
use crate::ui::output;
use anyhow::Result;

/// Check the batch.
pub fn check(ctx: &Context, args: &UnitArgs) -> Result<()> {
    let session = Session::open(ctx, args)?;

    let report = check_batch(&session.source, session.units.iter().cloned())?;

    if session.json() {
        output::json(&report)?;
    } else {
        for reference in &report.external {
            output::warn(
                format!(
                    "{} declares {} {}, which is not in the batch",
                    reference.unit, reference.relation, reference.target
                ),
                session.verbosity,
            );
        }
        if let Ok(order) = &report.order {
            output::print(
                format!("ok: {} units can be ordered", order.len()),
                session.verbosity,
            );
        }
    }

    report.order?;
    Ok(())
}
