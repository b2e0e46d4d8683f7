use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Service/version detection, OS fingerprinting, and the 1000 most common ports.
pub const DEFAULT_NMAP_ARGS: &[&str] = &["-sV", "-O", "-p-", "--top-ports", "1000"];

pub struct NmapScanner {
    binary: String,
    args: Vec<String>,
}

impl Default for NmapScanner {
    fn default() -> Self {
        Self::new("nmap", DEFAULT_NMAP_ARGS.iter().map(|a| a.to_string()).collect())
    }
}

impl NmapScanner {
    pub fn new(binary: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            args,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Full argument list passed to the binary, `-oX` and target included.
    pub fn command_args(&self, target: &str, output: &Path) -> Vec<String> {
        let mut args = self.args.clone();
        args.push("-oX".to_string());
        args.push(output.display().to_string());
        args.push(target.to_string());
        args
    }
}

impl super::Scanner for NmapScanner {
    fn name(&self) -> &'static str {
        "nmap"
    }

    fn run(&self, target: &str, output: &Path) -> Result<PathBuf> {
        // nmap reads a leading `-` as an option, not a host.
        if target.trim().is_empty() || target.starts_with('-') {
            return Err(Error::InvalidTarget(target.to_string()));
        }

        let args = self.command_args(target, output);
        info!(binary = %self.binary, scan_target = %target, "starting scan");
        debug!(command = %format!("{} {}", self.binary, args.join(" ")), "scanner command line");

        let result = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|source| Error::ScannerNotFound {
                binary: self.binary.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(Error::ScannerFailed {
                binary: self.binary.clone(),
                code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        if !output.exists() {
            return Err(Error::MissingOutput(output.to_path_buf()));
        }

        info!(output = %output.display(), "scan finished");
        Ok(output.to_path_buf())
    }
}
