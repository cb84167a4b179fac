//! The `inspect` command: list what `compute` would read, without computing.

use crate::config::RunConfig;
use anyhow::Context;
use chrono::NaiveDate;
use hyd_series::SeriesManifest;
use hyd_utils::dates::{days_between, format_date};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct InspectEntry {
    pub date: NaiveDate,
    pub path: PathBuf,
    /// Days since the previous mask, `None` for the first.
    pub gap_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub directory: PathBuf,
    pub rows: usize,
    pub cols: usize,
    pub span_days: i64,
    pub georeferenced: bool,
    pub geo_transform: Option<[f64; 6]>,
    pub entries: Vec<InspectEntry>,
    pub skipped: Vec<PathBuf>,
}

impl InspectReport {
    pub fn from_manifest(directory: PathBuf, manifest: &SeriesManifest) -> Self {
        let mut previous: Option<NaiveDate> = None;
        let entries = manifest
            .entries()
            .iter()
            .map(|entry| {
                let gap_days = previous.map(|p| days_between(&p, &entry.date));
                previous = Some(entry.date);
                InspectEntry {
                    date: entry.date,
                    path: entry.path.clone(),
                    gap_days,
                }
            })
            .collect();

        let (rows, cols) = manifest.dim();
        InspectReport {
            directory,
            rows,
            cols,
            span_days: days_between(&manifest.first_date(), &manifest.last_date()),
            georeferenced: manifest.metadata().is_georeferenced(),
            geo_transform: manifest.metadata().geo_transform(),
            entries,
            skipped: manifest.skipped().to_vec(),
        }
    }

    fn write_text<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "{}", self.directory.display())?;
        writeln!(
            out,
            "{} masks, {} x {} pixels, {} days",
            self.entries.len(),
            self.rows,
            self.cols,
            self.span_days
        )?;
        match self.geo_transform {
            Some(gt) => writeln!(
                out,
                "origin ({}, {}), pixel size ({}, {})",
                gt[0], gt[3], gt[1], gt[5]
            )?,
            None => writeln!(out, "not georeferenced")?,
        }
        for entry in &self.entries {
            let gap = entry
                .gap_days
                .map(|d| format!("+{}", d))
                .unwrap_or_else(|| "-".to_string());
            let name = entry
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            writeln!(out, "{}\t{:>6}\t{}", format_date(&entry.date), gap, name)?;
        }
        for skipped in &self.skipped {
            writeln!(out, "skipped\t{}", skipped.display())?;
        }
        Ok(())
    }
}

pub fn run_inspect<W: Write>(config: &RunConfig, json: bool, out: &mut W) -> anyhow::Result<()> {
    let input = &config.input_directory;
    let manifest = config
        .loader()
        .discover()
        .with_context(|| format!("reading inundation masks from {}", input.display()))?;

    let report = InspectReport::from_manifest(input.clone(), &manifest);
    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        report.write_text(out)?;
    }
    Ok(())
}
