//! The scan → parse → advise sequence.

use crate::advisor::Advisor;
use crate::error::Result;
use crate::model::ScanReport;
use crate::output::{format_timestamp, sanitize_target};
use crate::parser;
use crate::scanner::Scanner;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the raw scanner output for a run is kept.
pub fn scan_output_path(dir: &Path, target: &str, time: &DateTime<Utc>) -> PathBuf {
    dir.join(format!(
        "nmap_{}_{}.xml",
        sanitize_target(target),
        format_timestamp(time)
    ))
}

/// Builds an annotated report from an existing scanner output file.
pub fn report_from_file(
    target: &str,
    xml: &Path,
    advisor: &Advisor,
    time: DateTime<Utc>,
) -> Result<ScanReport> {
    let mut records = parser::parse_file(xml)?;
    advisor.annotate(&mut records);

    let report = ScanReport::new(target, records).with_time(time);
    info!(
        hosts = report.hosts().len(),
        ports = report.records.len(),
        open = report.open_ports(),
        "parsed scan output"
    );
    Ok(report)
}

/// Runs `scanner` against `target`, keeping its output in `dir`, and
/// returns the annotated report.
pub fn run(
    scanner: &dyn Scanner,
    advisor: &Advisor,
    target: &str,
    dir: &Path,
    time: DateTime<Utc>,
) -> Result<ScanReport> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }

    let output = scan_output_path(dir, target, &time);
    let xml = scanner.run(target, &output)?;
    report_from_file(target, &xml, advisor, time)
}
