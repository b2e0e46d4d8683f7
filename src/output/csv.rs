use crate::error::Result;
use crate::model::ScanRecord;
use serde::Serialize;
use std::io;
use std::path::Path;

pub const CSV_HEADERS: [&str; 10] = [
    "ip",
    "hostname",
    "os",
    "port",
    "protocol",
    "state",
    "service",
    "version",
    "banner",
    "suggestions",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    ip: &'a str,
    hostname: &'a str,
    os: &'a str,
    port: u16,
    protocol: &'a str,
    state: &'a str,
    service: &'a str,
    version: &'a str,
    banner: &'a str,
    suggestions: &'a str,
}

impl<'a> From<&'a ScanRecord> for CsvRow<'a> {
    fn from(r: &'a ScanRecord) -> Self {
        Self {
            ip: &r.ip,
            hostname: &r.hostname,
            os: &r.os,
            port: r.port,
            protocol: &r.protocol,
            state: &r.state,
            service: &r.service,
            version: &r.version,
            banner: &r.banner,
            suggestions: &r.suggestion,
        }
    }
}

/// Writes the header and one row per record to `path`.
pub fn write_csv(path: &Path, records: &[ScanRecord]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv_to(file, records)
}

/// Same as [`write_csv`], for any writer. The header is written even when
/// there are no records.
pub fn write_csv_to<W: io::Write>(writer: W, records: &[ScanRecord]) -> Result<()> {
    let mut wtr = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_HEADERS)?;
    for record in records {
        wtr.serialize(CsvRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}
