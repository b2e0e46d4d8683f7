//! Configuration file handling.
//!
//! This module provides loading and saving of vaptscan configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/vaptscan/config.toml`
//! - macOS: `~/Library/Application Support/vaptscan/config.toml`
//! - Windows: `%APPDATA%\vaptscan\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! [scanner]
//! binary = "/usr/local/bin/nmap"
//! args = ["-sV", "-O", "-p-", "--top-ports", "1000"]
//!
//! [report]
//! output_dir = "reports"
//! json = true
//!
//! [[advisor.rules]]
//! ports = [21]
//! service = "ftp"
//! note = "Disable anonymous FTP and prefer SFTP."
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::advisor::{Advisor, AdvisoryRule};
use crate::scanner::{NmapScanner, DEFAULT_NMAP_ARGS};

/// Application configuration.
///
/// Every section falls back to its defaults when left out of the file.
///
/// # Example
///
/// ```no_run
/// use vaptscan::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Scanner: {}", config.scanner.binary);
/// println!("Reports go to: {}", config.report.output_dir.display());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub report: ReportConfig,
    pub advisor: AdvisorConfig,
}

/// How the external scanner is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Scanner executable, looked up on `PATH` when not absolute.
    ///
    /// Default: "nmap"
    pub binary: String,

    /// Arguments placed before `-oX <file> <target>`.
    ///
    /// Default: `-sV -O -p- --top-ports 1000`
    pub args: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            binary: "nmap".to_string(),
            args: DEFAULT_NMAP_ARGS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Where and how reports are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory for reports and the raw scanner output.
    ///
    /// Default: current directory
    pub output_dir: PathBuf,

    /// Also write a JSON report.
    ///
    /// Default: false
    pub json: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            json: false,
        }
    }
}

/// Site-specific advisory rules, applied after the built-in ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub rules: Vec<AdvisoryRule>,
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path, with the same fallback
    /// as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vaptscan")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    pub fn scanner(&self) -> NmapScanner {
        NmapScanner::new(&self.scanner.binary, self.scanner.args.clone())
    }

    pub fn advisor(&self) -> Advisor {
        Advisor::with_rules(self.advisor.rules.iter().cloned())
    }
}
