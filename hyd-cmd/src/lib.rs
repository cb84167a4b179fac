//! Command implementations for the hydroperiod CLI.
//!
//! `compute` turns a directory of dated inundation masks into a
//! hydroperiod raster; `inspect` lists the series it would read.

use clap::{Args, Subcommand};
use log::debug;
use std::io;
use std::path::PathBuf;

pub mod compute;
pub mod config;
pub mod inspect;
pub mod prompt;
pub mod report;

use config::{ConfigFile, RunConfig};
use hyd_series::DatePolicy;

/// Options shared by every command that reads a mask series.
#[derive(Args, Debug, Clone, Default)]
pub struct SeriesArgs {
    /// Directory holding the dated .tif/.tiff masks (asked for when omitted)
    pub directory: Option<PathBuf>,

    /// chrono format of the date in each file name, before the first '.'
    #[arg(long)]
    pub date_format: Option<String>,

    /// Pixel value marking no-data in the input masks (must not be 0 or 1)
    #[arg(long, allow_negative_numbers = true)]
    pub no_data: Option<f64>,

    /// Fail on file names without a parsable date instead of skipping them
    #[arg(long)]
    pub strict_dates: bool,

    /// JSON config file; command-line flags take precedence over it
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute the hydroperiod map from a directory of dated masks
    Compute {
        #[command(flatten)]
        series: SeriesArgs,

        /// Output GeoTIFF path (default: <directory>/output/hydroperiod_map.tif)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output value for pixels no interval covered; negative or NaN (default: -1)
        #[arg(long, allow_negative_numbers = true)]
        output_no_data: Option<f64>,

        /// Skip the PNG preview
        #[arg(long)]
        no_preview: bool,

        /// Skip the per-interval CSV report
        #[arg(long)]
        no_report: bool,
    },

    /// List the masks, dates and gaps a compute run would use
    Inspect {
        #[command(flatten)]
        series: SeriesArgs,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Default for Command {
    /// Interactive compute with all defaults.
    fn default() -> Self {
        Command::Compute {
            series: SeriesArgs::default(),
            output: None,
            output_no_data: None,
            no_preview: false,
            no_report: false,
        }
    }
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Compute {
            series,
            output,
            output_no_data,
            no_preview,
            no_report,
        } => {
            let mut config = resolve_config(&series)?;
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(output_no_data) = output_no_data {
                config.output_no_data = output_no_data;
            }
            if no_preview {
                config.write_preview = false;
            }
            if no_report {
                config.write_report = false;
            }
            debug!("Run configuration: {:?}", config);
            compute::run_compute(&config)?;
            Ok(())
        }
        Command::Inspect { series, json } => {
            let config = resolve_config(&series)?;
            let stdout = io::stdout();
            inspect::run_inspect(&config, json, &mut stdout.lock())
        }
    }
}

/// Merge flags over the config file over defaults, prompting on stdin for
/// the input directory if nothing supplies it.
fn resolve_config(args: &SeriesArgs) -> anyhow::Result<RunConfig> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let directory = match args.directory.clone().or_else(|| file.input_directory.clone()) {
        Some(directory) => directory,
        None => prompt::prompt_directory(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    Ok(apply_args(RunConfig::from_file(directory, &file), args))
}

fn apply_args(mut config: RunConfig, args: &SeriesArgs) -> RunConfig {
    if let Some(date_format) = &args.date_format {
        config.date_format = date_format.clone();
    }
    if let Some(no_data) = args.no_data {
        config.no_data_value = no_data;
    }
    if args.strict_dates {
        config.date_policy = DatePolicy::Strict;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    #[test]
    fn test_parse_compute_flags() {
        let cli = TestCli::try_parse_from([
            "hydroperiod",
            "compute",
            "/data/masks",
            "--no-data",
            "-9999",
            "--strict-dates",
            "-o",
            "/tmp/hp.tif",
            "--no-preview",
            "--output-no-data",
            "-9999",
        ])
        .unwrap();
        match cli.command {
            Command::Compute {
                series,
                output,
                output_no_data,
                no_preview,
                no_report,
            } => {
                assert_eq!(output_no_data, Some(-9999.0));
                assert_eq!(series.directory, Some(PathBuf::from("/data/masks")));
                assert_eq!(series.no_data, Some(-9999.0));
                assert!(series.strict_dates);
                assert_eq!(output, Some(PathBuf::from("/tmp/hp.tif")));
                assert!(no_preview);
                assert!(!no_report);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_default_command_is_interactive_compute() {
        match Command::default() {
            Command::Compute {
                series,
                output,
                output_no_data,
                no_preview,
                no_report,
            } => {
                // No directory, so run() falls back to the prompt
                assert_eq!(series.directory, None);
                assert_eq!(series.config, None);
                assert_eq!(output, None);
                assert_eq!(output_no_data, None);
                assert!(!no_preview);
                assert!(!no_report);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_bare_invocation_has_no_subcommand() {
        #[derive(Parser)]
        struct BareCli {
            #[command(subcommand)]
            command: Option<Command>,
        }
        let cli = BareCli::try_parse_from(["hydroperiod"]).unwrap();
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Command::Compute { no_preview: false, no_report: false, .. }
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let file = ConfigFile::from_json_str(
            r#"{ "date_format": "%Y%m%d", "no_data_value": -9999, "date_policy": "lenient" }"#,
        )
        .unwrap();
        let args = SeriesArgs {
            no_data: Some(255.0),
            strict_dates: true,
            ..SeriesArgs::default()
        };
        let config = apply_args(RunConfig::from_file("/data", &file), &args);
        assert_eq!(config.date_format, "%Y%m%d");
        assert_eq!(config.no_data_value, 255.0);
        assert_eq!(config.date_policy, DatePolicy::Strict);
    }

    #[test]
    fn test_directory_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("run.json");
        std::fs::write(&config_path, r#"{ "input_directory": "/data/masks" }"#).unwrap();
        let args = SeriesArgs {
            config: Some(config_path),
            ..SeriesArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.input_directory, PathBuf::from("/data/masks"));
    }
}
