//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `hostcollide scan` - Probe IPs for virtual-host collisions
//! - `hostcollide profiles list|show|create|delete` - Manage scan profiles

mod profiles;
mod scan;

pub use profiles::{ProfilesAction, ProfilesCommand};
pub use scan::ScanCommand;

use clap::{Parser, Subcommand};
use std::fmt;
use std::path::PathBuf;

/// hostcollide - find IPs that serve hostnames DNS does not point at them.
///
/// Sends HTTP(S) requests straight to each IP with a candidate hostname in
/// the Host header, and reports every address that answers.
#[derive(Parser, Debug)]
#[command(name = "hostcollide")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Virtual-host collision prober", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to custom settings file
    #[arg(long, global = true, value_name = "PATH", env = "HOSTCOLLIDE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe IPs for virtual-host collisions
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Manage scan profiles
    #[command(alias = "p")]
    Profiles(ProfilesCommand),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_command() {
        let cli = Cli::try_parse_from([
            "hostcollide",
            "scan",
            "--ip",
            "10.0.0.1",
            "--ip",
            "10.0.0.2",
            "--domains",
            "domains.txt",
            "--prefix",
            "www",
            "-p",
            "80,8080",
            "-c",
            "20",
            "-o",
            "json",
        ])
        .unwrap();

        let Commands::Scan(scan) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(scan.ip, vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(scan.domains, Some(PathBuf::from("domains.txt")));
        assert_eq!(scan.prefix, vec!["www"]);
        assert_eq!(scan.ports.as_deref(), Some("80,8080"));
        assert_eq!(scan.concurrency, Some(20));
        assert_eq!(scan.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["hostcollide", "profiles", "list", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert!(Cli::try_parse_from(["hostcollide", "-v", "-q", "profiles", "list"]).is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Plain.to_string(), "plain");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }
}
