//! Spreadsheet-exportable renderings of the demand table.

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::services::aggregate::DemandTable;

/// Render a demand table as a DataFrame with columns
/// `Time, Arrival, Departure, Domestic`. Timestamps render as
/// `YYYY-MM-DD HH:MM:SS` text.
pub fn demand_dataframe(table: &DemandTable) -> Result<DataFrame> {
    let times: Vec<String> = table
        .grid
        .iter_times()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();

    let df = df!(
        "Time" => times,
        "Arrival" => table.arrival.clone(),
        "Departure" => table.departure.clone(),
        "Domestic" => table.domestic.clone(),
    )?;
    Ok(df)
}

/// Write a demand table to a CSV file.
pub fn write_demand_csv(table: &DemandTable, path: &Path) -> Result<()> {
    let mut df = demand_dataframe(table)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(&mut df)?;
    debug!(path = %path.display(), rows = df.height(), "demand table written");
    Ok(())
}
