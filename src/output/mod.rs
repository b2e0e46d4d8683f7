//! Report writers.
//!
//! Every run writes a CSV and an HTML file named
//! `vapt_report_<target>_<timestamp>.<ext>`; JSON is optional. The
//! terminal table in [`print_cli_table`] is for interactive use only.

mod cli;
mod csv;
mod html;
mod json;

pub use self::cli::print_cli_table;
pub use self::csv::{write_csv, write_csv_to, CSV_HEADERS};
pub use self::html::generate_html_string;
pub use self::json::generate_json_string;

use crate::error::Result;
use crate::model::ScanReport;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// UTC timestamp format used in report filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%MZ";

/// Report file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Comma-separated values, one row per port
    Csv,
    /// Self-contained HTML page
    Html,
    /// The full report as JSON
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "html" | "htm" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Use 'csv', 'html', or 'json'",
                s
            )),
        }
    }
}

/// Makes a target usable inside a filename.
///
/// Anything other than ASCII letters, digits, `.`, `-` and `_` becomes `_`,
/// so `10.0.0.0/24` turns into `10.0.0.0_24`.
pub fn sanitize_target(target: &str) -> String {
    target
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// `vapt_report_<target>_<timestamp>`, without extension.
pub fn report_basename(target: &str, time: &DateTime<Utc>) -> String {
    format!(
        "vapt_report_{}_{}",
        sanitize_target(target),
        format_timestamp(time)
    )
}

/// Writes `report` in each of `formats` under `dir`, creating it if needed.
///
/// Returns the written paths in the order of `formats`.
pub fn write_reports(
    report: &ScanReport,
    dir: &Path,
    formats: &[ReportFormat],
) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let basename = report_basename(&report.target, &report.generated_at);
    let mut written = Vec::with_capacity(formats.len());

    for format in formats {
        let path = dir.join(format!("{}.{}", basename, format.extension()));
        match format {
            ReportFormat::Csv => write_csv(&path, &report.records)?,
            ReportFormat::Html => fs::write(&path, generate_html_string(report))?,
            ReportFormat::Json => fs::write(&path, generate_json_string(report)?)?,
        }
        info!(path = %path.display(), "wrote report");
        written.push(path);
    }

    Ok(written)
}
