//! Core data types for scan records and reports.
//!
//! - [`ScanRecord`] - One port on one host, as reported by the scanner
//! - [`ScanReport`] - All records from one run, with target and timestamp
//! - [`HostSummary`] - Records grouped under their host
//!
//! # Example
//!
//! ```
//! use vaptscan::{ScanRecord, ScanReport};
//!
//! let record = ScanRecord {
//!     host_index: 0,
//!     ip: "192.0.2.10".into(),
//!     hostname: String::new(),
//!     os: String::new(),
//!     port: 22,
//!     protocol: "tcp".into(),
//!     state: "open".into(),
//!     service: "ssh".into(),
//!     version: String::new(),
//!     banner: "ssh".into(),
//!     suggestion: String::new(),
//! };
//! let report = ScanReport::new("192.0.2.10", vec![record]);
//!
//! assert_eq!(report.hosts().len(), 1);
//! ```

mod record;

pub use record::*;
