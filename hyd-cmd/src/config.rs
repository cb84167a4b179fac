//! Run configuration.
//!
//! Precedence, highest first: command-line flags, the optional JSON
//! config file, built-in defaults. The input directory falls back to an
//! interactive prompt when neither flag nor file supplies it.

use anyhow::Context;
use hyd_data::is_unambiguous_no_data;
use hyd_series::loader::DEFAULT_NO_DATA;
use hyd_series::{DatePolicy, SeriesLoader};
use hyd_utils::dates::DEFAULT_DATE_FORMAT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sub-directory of the input directory that receives the outputs by default.
pub const OUTPUT_DIRECTORY: &str = "output";

/// Default output raster file name.
pub const OUTPUT_FILE_NAME: &str = "hydroperiod_map.tif";

/// Preview image written next to the output raster.
pub const PREVIEW_FILE_NAME: &str = "hydroperiod_visualization.png";

/// Interval report written next to the output raster.
pub const REPORT_FILE_NAME: &str = "hydroperiod_intervals.csv";

/// Optional settings read from a JSON file.
///
/// ```json
/// {
///   "input_directory": "/data/wetland/masks",
///   "date_format": "%Y%m%d",
///   "no_data_value": -9999,
///   "date_policy": "strict"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub input_directory: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub date_format: Option<String>,
    pub no_data_value: Option<f64>,
    pub output_no_data: Option<f64>,
    pub date_policy: Option<DatePolicy>,
    pub write_preview: Option<bool>,
    pub write_report: Option<bool>,
}

impl ConfigFile {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub input_directory: PathBuf,
    pub output_path: PathBuf,
    pub date_format: String,
    /// No-data sentinel of the input masks.
    pub no_data_value: f64,
    /// Fill value and GDAL_NODATA of the output raster.
    pub output_no_data: f64,
    pub date_policy: DatePolicy,
    pub write_preview: bool,
    pub write_report: bool,
}

impl RunConfig {
    /// Defaults for `input_directory`; outputs go to `<input>/output/`.
    pub fn for_directory(input_directory: impl Into<PathBuf>) -> Self {
        let input_directory = input_directory.into();
        let output_path = input_directory
            .join(OUTPUT_DIRECTORY)
            .join(OUTPUT_FILE_NAME);
        RunConfig {
            input_directory,
            output_path,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            no_data_value: DEFAULT_NO_DATA,
            output_no_data: DEFAULT_NO_DATA,
            date_policy: DatePolicy::default(),
            write_preview: true,
            write_report: true,
        }
    }

    /// Defaults for `input_directory`, overridden by whatever `file` sets.
    pub fn from_file(input_directory: impl Into<PathBuf>, file: &ConfigFile) -> Self {
        let mut config = RunConfig::for_directory(input_directory);
        if let Some(output_path) = &file.output_path {
            config.output_path = output_path.clone();
        }
        if let Some(date_format) = &file.date_format {
            config.date_format = date_format.clone();
        }
        if let Some(no_data_value) = file.no_data_value {
            config.no_data_value = no_data_value;
        }
        if let Some(output_no_data) = file.output_no_data {
            config.output_no_data = output_no_data;
        }
        if let Some(date_policy) = file.date_policy {
            config.date_policy = date_policy;
        }
        if let Some(write_preview) = file.write_preview {
            config.write_preview = write_preview;
        }
        if let Some(write_report) = file.write_report {
            config.write_report = write_report;
        }
        config
    }

    /// Reject settings that would make the output ambiguous.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !is_unambiguous_no_data(self.output_no_data) {
            anyhow::bail!(
                "output no-data value {} could be a real hydroperiod; use a negative value or NaN",
                self.output_no_data
            );
        }
        Ok(())
    }

    /// Directory receiving the raster and its companion files.
    pub fn output_directory(&self) -> &Path {
        self.output_path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn preview_path(&self) -> PathBuf {
        self.output_directory().join(PREVIEW_FILE_NAME)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_directory().join(REPORT_FILE_NAME)
    }

    pub fn loader(&self) -> SeriesLoader {
        SeriesLoader::new(&self.input_directory)
            .date_format(self.date_format.clone())
            .date_policy(self.date_policy)
            .no_data(self.no_data_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::for_directory("/data/masks");
        assert_eq!(
            config.output_path,
            PathBuf::from("/data/masks/output/hydroperiod_map.tif")
        );
        assert_eq!(config.date_format, "%Y_%m_%d");
        assert_eq!(config.no_data_value, -1.0);
        assert_eq!(config.output_no_data, -1.0);
        assert_eq!(config.date_policy, DatePolicy::Lenient);
        assert!(config.write_preview);
        assert!(config.write_report);
        assert_eq!(
            config.preview_path(),
            PathBuf::from("/data/masks/output/hydroperiod_visualization.png")
        );
        assert_eq!(
            config.report_path(),
            PathBuf::from("/data/masks/output/hydroperiod_intervals.csv")
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = ConfigFile::from_json_str(
            r#"{
                "output_path": "/tmp/out/hp.tif",
                "date_format": "%Y%m%d",
                "no_data_value": -9999,
                "date_policy": "strict",
                "write_preview": false
            }"#,
        )
        .unwrap();
        let config = RunConfig::from_file("/data/masks", &file);
        assert_eq!(config.output_path, PathBuf::from("/tmp/out/hp.tif"));
        assert_eq!(config.output_directory(), Path::new("/tmp/out"));
        assert_eq!(config.date_format, "%Y%m%d");
        assert_eq!(config.no_data_value, -9999.0);
        assert_eq!(config.date_policy, DatePolicy::Strict);
        assert!(!config.write_preview);
        assert!(config.write_report);
    }

    #[test]
    fn test_input_and_output_no_data_are_independent() {
        let file = ConfigFile::from_json_str(r#"{ "no_data_value": 255 }"#).unwrap();
        let config = RunConfig::from_file("/data/masks", &file);
        assert_eq!(config.no_data_value, 255.0);
        assert_eq!(config.output_no_data, -1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_output_no_data_a_total_could_take() {
        let mut config = RunConfig::for_directory("/data/masks");
        for value in [0.0, 5.0, 255.0] {
            config.output_no_data = value;
            assert!(config.validate().is_err());
        }
        config.output_no_data = f64::NAN;
        assert!(config.validate().is_ok());
        config.output_no_data = -9999.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(ConfigFile::from_json_str(r#"{ "input_dir": "/data" }"#).is_err());
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        assert_eq!(ConfigFile::from_json_str("{}").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_relative_output_without_parent() {
        let mut config = RunConfig::for_directory("masks");
        config.output_path = PathBuf::from("hp.tif");
        assert_eq!(config.preview_path(), PathBuf::from("hydroperiod_visualization.png"));
    }
}
