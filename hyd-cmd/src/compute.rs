//! The `compute` command: dated masks in, hydroperiod raster out.

use crate::config::RunConfig;
use crate::report::write_interval_report_file;
use anyhow::Context;
use hyd_data::{accumulate_stream, HydroperiodStatistics};
use hyd_raster::preview::write_preview;
use hyd_raster::write_geotiff;
use log::{info, warn};
use std::path::PathBuf;

/// Files written by a successful run.
#[derive(Debug, Clone)]
pub struct ComputeOutcome {
    pub output_path: PathBuf,
    pub preview_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub statistics: HydroperiodStatistics,
}

/// Compute the hydroperiod for `config.input_directory`.
///
/// Every input is validated and the whole accumulation finishes before the
/// output directory is touched, so a failing run leaves no output behind.
pub fn run_compute(config: &RunConfig) -> anyhow::Result<ComputeOutcome> {
    config.validate()?;
    let input = &config.input_directory;
    let manifest = config
        .loader()
        .discover()
        .with_context(|| format!("reading inundation masks from {}", input.display()))?;

    let (rows, cols) = manifest.dim();
    info!(
        "Using {} masks ({} x {}) from {} to {}",
        manifest.len(),
        rows,
        cols,
        manifest.first_date(),
        manifest.last_date()
    );
    if !manifest.metadata().is_georeferenced() {
        warn!("First mask carries no georeferencing; output will not be georeferenced");
    }

    let hydroperiod = accumulate_stream(manifest.stream(), config.output_no_data)
        .context("computing hydroperiod")?;

    let output_directory = config.output_directory();
    std::fs::create_dir_all(output_directory)
        .with_context(|| format!("creating output directory {}", output_directory.display()))?;

    write_geotiff(
        &config.output_path,
        hydroperiod.values(),
        manifest.metadata(),
        config.output_no_data,
    )
    .with_context(|| format!("writing {}", config.output_path.display()))?;
    info!("Hydroperiod map written to {}", config.output_path.display());

    let report_path = if config.write_report {
        let path = config.report_path();
        write_interval_report_file(&path, hydroperiod.intervals())?;
        info!("Interval report written to {}", path.display());
        Some(path)
    } else {
        None
    };

    let preview_path = if config.write_preview {
        let path = config.preview_path();
        write_preview(&path, hydroperiod.values(), config.output_no_data)
            .with_context(|| format!("writing preview {}", path.display()))?;
        info!("Preview written to {}", path.display());
        Some(path)
    } else {
        None
    };

    let statistics = hydroperiod.statistics();
    log_statistics(&statistics);

    Ok(ComputeOutcome {
        output_path: config.output_path.clone(),
        preview_path,
        report_path,
        statistics,
    })
}

fn log_statistics(statistics: &HydroperiodStatistics) {
    info!(
        "{} valid pixels, {} no-data pixels over {} days",
        statistics.valid_pixels, statistics.no_data_pixels, statistics.span_days
    );
    if let (Some(min), Some(max), Some(mean)) = (statistics.min, statistics.max, statistics.mean) {
        info!("Hydroperiod min {:.2}, max {:.2}, mean {:.2} days", min, max, mean);
    }
    if let Some(fraction) = statistics.mean_fraction_of_span() {
        info!("Mean inundated share of the period: {:.1}%", fraction * 100.0);
    }
}
