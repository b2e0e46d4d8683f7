//! External scanner invocation.
//!
//! The [`Scanner`] trait is the boundary between vaptscan and the tool that
//! actually touches the network. [`NmapScanner`] is the only production
//! implementation; tests substitute their own.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use vaptscan::scanner::{NmapScanner, Scanner};
//!
//! let scanner = NmapScanner::default();
//! let xml = scanner.run("scanme.nmap.org", Path::new("scan.xml"))?;
//! println!("nmap wrote {}", xml.display());
//! # Ok::<(), vaptscan::Error>(())
//! ```

mod nmap;

pub use nmap::{NmapScanner, DEFAULT_NMAP_ARGS};

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Runs a scan and leaves a structured result file behind.
pub trait Scanner {
    /// Returns the human-readable name of this scanner.
    fn name(&self) -> &'static str;

    /// Scans `target`, writing the result to `output`.
    ///
    /// Returns the path of the written artifact.
    ///
    /// # Errors
    ///
    /// Fails if the tool cannot be started, exits unsuccessfully, or does
    /// not produce the output file.
    fn run(&self, target: &str, output: &Path) -> Result<PathBuf>;
}
