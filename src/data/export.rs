//! CSV export of analysis tables
//!
//! Undefined fields are written as empty cells.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::core::StrikewiseResult;
use crate::projection::Projection;
use crate::selection::SelectedContract;

fn write_rows<W: io::Write, T: Serialize>(writer: W, rows: &[T]) -> StrikewiseResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the projection table, one line per strike
pub fn write_projections_csv<W: io::Write>(
    writer: W,
    projections: &[Projection],
) -> StrikewiseResult<()> {
    write_rows(writer, projections)
}

/// Write the selected contracts in processing order
pub fn write_selection_csv<W: io::Write>(
    writer: W,
    selected: &[SelectedContract],
) -> StrikewiseResult<()> {
    write_rows(writer, selected)
}

pub fn write_projections_csv_file(
    path: impl AsRef<Path>,
    projections: &[Projection],
) -> StrikewiseResult<()> {
    let file = File::create(path.as_ref())?;
    write_projections_csv(file, projections)?;
    tracing::info!("Wrote {} projections to {:?}", projections.len(), path.as_ref());
    Ok(())
}
