//! Plain CSV export of the assembled report table.
//!
//! Formula columns are written empty; only the extracted values are exported.

use anyhow::{Context, Result};
use std::io;
use std::path::Path;

use crate::assemble::{InventoryReport, ReportCell};

pub fn write_csv<W: io::Write>(report: &InventoryReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(report.columns.iter().map(|c| c.name.as_str()))?;
    for row in &report.rows {
        wtr.write_record(row.iter().map(|cell| match cell {
            ReportCell::Value(v) => v.to_string(),
            ReportCell::Formula(_) => String::new(),
        }))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_csv(report: &InventoryReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(report, file).with_context(|| format!("write {}", path.display()))
}
