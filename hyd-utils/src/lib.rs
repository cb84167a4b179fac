//! Shared utility functions for the hydroperiod crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::NaiveDate;
    use std::path::Path;

    /// Filename date format used by the inundation mask exports: "YYYY_MM_DD"
    pub const DEFAULT_DATE_FORMAT: &str = "%Y_%m_%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string with the given chrono format.
    pub fn parse_date(s: &str, format: &str) -> Result<NaiveDate, DateError> {
        NaiveDate::parse_from_str(s, format).map_err(|source| DateError::Parse {
            input: s.to_string(),
            format: format.to_string(),
            source,
        })
    }

    /// The part of a file name before its first `.`.
    ///
    /// `2021_03_15.tif` and `2021_03_15.mask.TIFF` both yield `2021_03_15`.
    pub fn file_stem_before_dot(path: &Path) -> Option<&str> {
        let name = path.file_name()?.to_str()?;
        name.split('.').next().filter(|stem| !stem.is_empty())
    }

    /// Extract the observation date encoded in a raster's file name.
    pub fn date_from_file_name(path: &Path, format: &str) -> Result<NaiveDate, DateError> {
        let stem = file_stem_before_dot(path).ok_or_else(|| DateError::NoFileName {
            path: path.display().to_string(),
        })?;
        parse_date(stem, format)
    }

    /// Whole days from `start` to `end`. Negative when `end` precedes `start`.
    pub fn days_between(start: &NaiveDate, end: &NaiveDate) -> i64 {
        (*end - *start).num_days()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;
        use std::path::PathBuf;

        #[test]
        fn test_date_from_file_name() {
            let path = PathBuf::from("/data/masks/2021_03_15.tif");
            let date = date_from_file_name(&path, DEFAULT_DATE_FORMAT).unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2021, 3, 15).unwrap());
        }

        #[test]
        fn test_date_from_file_name_multiple_dots() {
            let path = PathBuf::from("2020_12_01.mask.TIFF");
            let date = date_from_file_name(&path, DEFAULT_DATE_FORMAT).unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2020, 12, 1).unwrap());
        }

        #[test]
        fn test_date_from_file_name_custom_format() {
            let path = PathBuf::from("20220704.tif");
            let date = date_from_file_name(&path, "%Y%m%d").unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2022, 7, 4).unwrap());
        }

        #[test]
        fn test_date_from_file_name_invalid() {
            let path = PathBuf::from("hydroperiod_map.tif");
            let err = date_from_file_name(&path, DEFAULT_DATE_FORMAT).unwrap_err();
            assert!(err.to_string().contains("hydroperiod_map"));

            // Feb 30 is not a calendar day
            let path = PathBuf::from("2021_02_30.tif");
            assert!(date_from_file_name(&path, DEFAULT_DATE_FORMAT).is_err());
        }

        #[test]
        fn test_date_from_hidden_file() {
            let path = PathBuf::from(".tif");
            let err = date_from_file_name(&path, DEFAULT_DATE_FORMAT).unwrap_err();
            assert!(matches!(err, DateError::NoFileName { .. }));
        }

        #[test]
        fn test_days_between() {
            let start = NaiveDate::from_ymd_opt(2020, 2, 25).unwrap();
            let end = NaiveDate::from_ymd_opt(2020, 3, 3).unwrap();
            // 2020 is a leap year
            assert_eq!(days_between(&start, &end), 7);
            assert_eq!(days_between(&end, &start), -7);
            assert_eq!(days_between(&start, &start), 0);
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted, "%Y-%m-%d").unwrap();
            assert_eq!(parsed, date);
        }
    }
}

/// Error types
pub mod error {
    use thiserror::Error;

    /// Failure to turn a file name into an observation date.
    #[derive(Debug, Error)]
    pub enum DateError {
        #[error("cannot parse date from '{input}' with format '{format}': {source}")]
        Parse {
            input: String,
            format: String,
            #[source]
            source: chrono::format::ParseError,
        },

        #[error("no usable file name in path {path}")]
        NoFileName { path: String },
    }
}
