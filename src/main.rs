use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vaptscan::{
    advisor::DEFAULT_NOTE,
    config::Config,
    output::{print_cli_table, write_reports, ReportFormat},
    pipeline,
    scanner::Scanner,
    Error,
};

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "vaptscan")]
#[command(
    author,
    version,
    about = "Run nmap against a target and write vulnerability-assessment reports"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a target and write CSV and HTML reports
    Scan {
        /// Host, address, or range passed to the scanner (must not start with `-`)
        target: String,

        /// Report on an existing nmap XML file instead of scanning
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for reports (defaults to the configured one)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also write a JSON report
        #[arg(long)]
        json: bool,

        /// Only print the paths of the written reports
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the advisory rules in effect
    Rules,

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout; a failed write there is still a failure.
            let printed = e.print();
            return if e.use_stderr() || printed.is_err() {
                ExitCode::from(exit_codes::ERROR)
            } else {
                ExitCode::from(exit_codes::SUCCESS)
            };
        }
    };

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// A scanner that failed with its own status hands that status back.
fn exit_code_for(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<Error>() {
        Some(Error::ScannerFailed {
            code: Some(code), ..
        }) => u8::try_from(*code)
            .ok()
            .filter(|c| *c != 0)
            .unwrap_or(exit_codes::ERROR),
        _ => exit_codes::ERROR,
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("ignoring unreadable config: {:#}", e);
            Config::default()
        }
    };

    match cli.command {
        Commands::Scan {
            target,
            input,
            output_dir,
            json,
            quiet,
        } => run_scan(&config, target, input, output_dir, json, quiet),
        Commands::Rules => {
            list_rules(&config);
            Ok(())
        }
        Commands::Config { init, path } => handle_config(init, path),
    }
}

fn run_scan(
    config: &Config,
    target: String,
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let dir = output_dir.unwrap_or_else(|| config.report.output_dir.clone());
    let advisor = config.advisor();
    let now = Utc::now();

    let report = match input {
        Some(xml) => {
            info!(input = %xml.display(), "reporting on existing scan output");
            pipeline::report_from_file(&target, &xml, &advisor, now)
                .with_context(|| format!("Failed to read scan output {}", xml.display()))?
        }
        None => {
            let scanner = config.scanner();
            let progress = (!quiet).then(|| {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                    pb.set_style(style);
                }
                pb.enable_steady_tick(Duration::from_millis(100));
                pb.set_message(format!("Scanning {} with {}...", target, scanner.name()));
                pb
            });

            let result = pipeline::run(&scanner, &advisor, &target, &dir, now);

            if let Some(pb) = progress {
                match &result {
                    Ok(report) => pb.finish_with_message(format!(
                        "Scan finished: {} ports on {} hosts",
                        report.records.len(),
                        report.hosts().len()
                    )),
                    Err(_) => pb.abandon_with_message("Scan failed"),
                }
            }

            result.with_context(|| format!("Scan of {} failed", target))?
        }
    };

    let mut formats = vec![ReportFormat::Csv, ReportFormat::Html];
    if json || config.report.json {
        formats.push(ReportFormat::Json);
    }

    let written = write_reports(&report, &dir, &formats)
        .with_context(|| format!("Failed to write reports to {}", dir.display()))?;

    if !quiet {
        print_cli_table(&report);
        println!();
    }

    for path in &written {
        println!("{}", path.display());
    }

    Ok(())
}

fn list_rules(config: &Config) {
    let advisor = config.advisor();
    let builtin = advisor.rules().len() - config.advisor.rules.len();

    println!("Advisory rules (applied to open ports, in order):");
    println!();

    for (i, rule) in advisor.rules().iter().enumerate() {
        let origin = if i < builtin { "built-in" } else { "config" };
        println!("  {:<28} [{}]", rule.criteria(), origin);
        println!("  {:<28} {}", "", rule.note);
        println!();
    }

    println!("  {:<28} [fallback]", "no rule matched");
    println!("  {:<28} {}", "", DEFAULT_NOTE);
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'vaptscan config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner_failed(code: Option<i32>) -> anyhow::Error {
        anyhow::Error::new(Error::ScannerFailed {
            binary: "nmap".to_string(),
            code,
            stderr: String::new(),
        })
        .context("Scan of 192.0.2.1 failed")
    }

    #[test]
    fn test_scanner_status_passed_through() {
        assert_eq!(exit_code_for(&scanner_failed(Some(7))), 7);
        assert_eq!(exit_code_for(&scanner_failed(Some(255))), 255);
    }

    #[test]
    fn test_unrepresentable_status_falls_back() {
        assert_eq!(exit_code_for(&scanner_failed(Some(300))), exit_codes::ERROR);
        assert_eq!(exit_code_for(&scanner_failed(Some(-1))), exit_codes::ERROR);
        assert_eq!(exit_code_for(&scanner_failed(Some(0))), exit_codes::ERROR);
        assert_eq!(exit_code_for(&scanner_failed(None)), exit_codes::ERROR);
    }

    #[test]
    fn test_other_errors_exit_one() {
        let err = anyhow::Error::new(Error::Parse("bad".to_string()));
        assert_eq!(exit_code_for(&err), exit_codes::ERROR);
        assert_eq!(exit_code_for(&anyhow::anyhow!("plain")), exit_codes::ERROR);
    }
}
