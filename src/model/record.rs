use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State string nmap reports for a reachable, listening port.
pub const OPEN_STATE: &str = "open";

/// One port entry observed on one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Position of the owning `<host>` element in the scan output.
    #[serde(default)]
    pub host_index: usize,
    pub ip: String,
    pub hostname: String,
    pub os: String,
    pub port: u16,
    pub protocol: String,
    pub state: String,
    pub service: String,
    pub version: String,
    pub banner: String,
    #[serde(default)]
    pub suggestion: String,
}

impl ScanRecord {
    pub fn is_open(&self) -> bool {
        self.state == OPEN_STATE
    }

    /// Service name and version joined the way nmap prints them.
    pub fn banner_for(service: &str, version: &str) -> String {
        format!("{} {}", service, version).trim().to_string()
    }
}

/// A host together with the records observed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSummary<'a> {
    pub host_index: usize,
    pub ip: &'a str,
    pub hostname: &'a str,
    pub os: &'a str,
    pub records: Vec<&'a ScanRecord>,
}

impl HostSummary<'_> {
    pub fn open_ports(&self) -> usize {
        self.records.iter().filter(|r| r.is_open()).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub target: String,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ScanRecord>,
}

impl ScanReport {
    pub fn new(target: impl Into<String>, records: Vec<ScanRecord>) -> Self {
        Self {
            target: target.into(),
            generated_at: Utc::now(),
            records,
        }
    }

    pub fn with_time(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn open_ports(&self) -> usize {
        self.records.iter().filter(|r| r.is_open()).count()
    }

    /// Groups records by the host they came from, keeping hosts in
    /// first-seen order. Hosts that share an address (e.g. several without
    /// one, reported as "unknown") stay separate.
    pub fn hosts(&self) -> Vec<HostSummary<'_>> {
        let mut hosts: Vec<HostSummary<'_>> = Vec::new();

        for record in &self.records {
            match hosts.iter_mut().find(|h| h.host_index == record.host_index) {
                Some(host) => host.records.push(record),
                None => hosts.push(HostSummary {
                    host_index: record.host_index,
                    ip: &record.ip,
                    hostname: &record.hostname,
                    os: &record.os,
                    records: vec![record],
                }),
            }
        }

        hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(host_index: usize, ip: &str, port: u16, state: &str) -> ScanRecord {
        ScanRecord {
            host_index,
            ip: ip.to_string(),
            hostname: String::new(),
            os: String::new(),
            port,
            protocol: "tcp".to_string(),
            state: state.to_string(),
            service: String::new(),
            version: String::new(),
            banner: String::new(),
            suggestion: String::new(),
        }
    }

    #[test]
    fn test_banner_trims_missing_parts() {
        assert_eq!(ScanRecord::banner_for("ssh", "OpenSSH 8.9"), "ssh OpenSSH 8.9");
        assert_eq!(ScanRecord::banner_for("http", ""), "http");
        assert_eq!(ScanRecord::banner_for("", ""), "");
    }

    #[test]
    fn test_hosts_grouped_in_first_seen_order() {
        let report = ScanReport::new(
            "net",
            vec![
                record(0, "10.0.0.2", 22, "open"),
                record(1, "10.0.0.1", 80, "open"),
                record(0, "10.0.0.2", 23, "closed"),
            ],
        );

        let hosts = report.hosts();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].ip, "10.0.0.2");
        assert_eq!(hosts[0].records.len(), 2);
        assert_eq!(hosts[0].open_ports(), 1);
        assert_eq!(hosts[1].ip, "10.0.0.1");
        assert_eq!(report.open_ports(), 2);
    }

    #[test]
    fn test_hosts_without_address_stay_separate() {
        let report = ScanReport::new(
            "net",
            vec![
                record(0, "unknown", 22, "open"),
                record(1, "unknown", 80, "open"),
                record(1, "unknown", 443, "closed"),
            ],
        );

        let hosts = report.hosts();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].records.len(), 1);
        assert_eq!(hosts[1].records.len(), 2);
    }

    #[test]
    fn test_is_open_requires_exact_state() {
        assert!(record(0, "h", 1, "open").is_open());
        assert!(!record(0, "h", 1, "open|filtered").is_open());
        assert!(!record(0, "h", 1, "").is_open());
    }
}
