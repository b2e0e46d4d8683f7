use crate::error::Result;
use crate::model::ScanReport;

pub fn generate_json_string(report: &ScanReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
