//! Per-interval CSV report.

use anyhow::Context;
use hyd_data::IntervalSummary;
use std::io::Write;
use std::path::Path;

/// Write one CSV row per interval, with a header row.
///
/// Columns: `start,end,days,wet_both,wet_one,dry_both,no_data`.
pub fn write_interval_report<W: Write>(
    writer: W,
    intervals: &[IntervalSummary],
) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for interval in intervals {
        csv_writer.serialize(interval)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_interval_report_file(path: &Path, intervals: &[IntervalSummary]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating report {}", path.display()))?;
    write_interval_report(file, intervals)
        .with_context(|| format!("writing report {}", path.display()))
}
