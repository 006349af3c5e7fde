//! Scan subcommand implementation.
//!
//! Handles the `hostcollide scan` command: builds the target list from the
//! host lists, probes it, and reports every collision found.

use crate::cli::OutputFormat;
use crate::config::{AppSettings, Profile, ProfileManager};
use crate::error::{CliResult, ValidationError, ValidationResult};
use crate::output::{self, LiveDisplay};
use crate::report::{ReportFormat, RunReport};
use crate::scanner::{CollisionScanner, HttpProber, ProbeConfig, ScanJobConfig, StopSignal};
use crate::types::{parse_ips, read_list_file, InputLists, PortList};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Probe IPs for virtual-host collisions.
///
/// Every hostname is tried against every IP on every port. List files hold
/// one entry per line; blank lines and `#` comments are ignored.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// File of IP addresses or CIDR ranges
    #[arg(long, value_name = "FILE")]
    pub ips: Option<PathBuf>,

    /// IP address or CIDR range (repeatable)
    #[arg(long, value_name = "IP")]
    pub ip: Vec<String>,

    /// File of base domains, combined with every prefix
    #[arg(long, value_name = "FILE")]
    pub domains: Option<PathBuf>,

    /// Base domain (repeatable)
    #[arg(long, value_name = "DOMAIN")]
    pub domain: Vec<String>,

    /// File of host prefixes such as "www" or "admin"
    #[arg(long, value_name = "FILE")]
    pub prefixes: Option<PathBuf>,

    /// Host prefix (repeatable)
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Vec<String>,

    /// File of complete hostnames, tried as-is
    #[arg(long, value_name = "FILE")]
    pub subdomains: Option<PathBuf>,

    /// Complete hostname (repeatable)
    #[arg(long, value_name = "HOST")]
    pub subdomain: Vec<String>,

    /// Ports to probe (e.g., "80,443", "8000-8010")
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Maximum number of probes in flight
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(short = 't', long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Per-target ceiling in milliseconds, across all schemes
    #[arg(long, value_name = "MS")]
    pub attempt_timeout: Option<u64>,

    /// Rate limit in requests per second (0 = unlimited)
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,

    /// User-Agent header sent with every probe
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Use a saved scan profile
    #[arg(long = "profile", short = 'P')]
    pub profile: Option<String>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write a report file when the run ends
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Report file format
    #[arg(long, value_enum, default_value = "csv")]
    pub report_format: ReportFormat,

    /// Don't draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Effective run parameters after layering flags over profile over settings.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScanOptions {
    ports: String,
    concurrency: usize,
    request_timeout_ms: u64,
    attempt_timeout_ms: u64,
    rate_limit: u32,
    user_agent: String,
    output: OutputFormat,
}

impl ScanOptions {
    /// Reject timeouts that would fail every target at once.
    fn validate(&self) -> ValidationResult<()> {
        if self.request_timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout {
                name: "request timeout",
            });
        }
        if self.attempt_timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout {
                name: "attempt timeout",
            });
        }
        Ok(())
    }
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, quiet: bool) -> CliResult<()> {
        let profile = match &self.profile {
            Some(name) => {
                let manager = ProfileManager::new()?;
                let profile = manager
                    .get(name)
                    .cloned()
                    .ok_or_else(|| crate::error::ProfileError::NotFound(name.clone()))?;
                Some(profile)
            }
            None => None,
        };

        let options = self.resolve(settings, profile.as_ref());
        debug!(?options, "resolved scan options");
        options.validate()?;

        let inputs = self.input_lists()?;
        let ports = PortList::parse(&options.ports)?;
        let targets = inputs.targets(&ports)?;

        let job_config = ScanJobConfig::default()
            .with_concurrency(options.concurrency)
            .with_attempt_timeout(Duration::from_millis(options.attempt_timeout_ms))
            .with_rate_limit(options.rate_limit);

        let probe_config = ProbeConfig::default()
            .with_timeout(Duration::from_millis(options.request_timeout_ms))
            .with_user_agent(options.user_agent.clone());
        let prober = HttpProber::new(&probe_config)?;
        let mut scanner = CollisionScanner::new(prober, job_config)?;

        let plain = options.output == OutputFormat::Plain;
        if plain && !quiet {
            output::print_run_header(
                inputs.ips.len(),
                hostname_count(&inputs),
                &ports.to_string(),
                targets.len(),
                options.concurrency,
            );
        }

        let stop = StopSignal::new();
        let ctrl_c = {
            let stop = stop.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, finishing in-flight probes");
                    stop.stop();
                }
            })
        };

        let mut display = LiveDisplay::new(targets.len(), !quiet && !self.no_progress, plain && !quiet);
        let report = RunReport::new(ports.to_string(), options.concurrency);
        let summary = scanner.run(targets, &mut display, &stop).await;
        ctrl_c.abort();

        let report = report.finalize(summary, scanner.take_results());
        display.finish(&report.summary());
        if report.stopped && !quiet {
            output::print_warning("run stopped before every target was probed");
        }

        if let Some(path) = &self.report {
            report.write_to(path, self.report_format)?;
            if plain && !quiet {
                output::print_info(&format!("Report written to {}", path.display()));
            }
        }

        output::print_results(&report, options.output)?;

        Ok(())
    }

    /// Layer command-line flags over the profile over the settings file.
    fn resolve(&self, settings: &AppSettings, profile: Option<&Profile>) -> ScanOptions {
        let output = self.output.unwrap_or_else(|| {
            OutputFormat::from_str(&settings.default_output_format, true).unwrap_or_else(|_| {
                warn!(
                    format = %settings.default_output_format,
                    "unknown output format in settings, using plain"
                );
                OutputFormat::Plain
            })
        });

        ScanOptions {
            ports: self
                .ports
                .clone()
                .or_else(|| profile.map(|p| p.ports.clone()))
                .unwrap_or_else(|| settings.default_ports.clone()),
            concurrency: self
                .concurrency
                .or(profile.map(|p| p.concurrency))
                .unwrap_or(settings.default_concurrency),
            request_timeout_ms: self
                .timeout
                .or(profile.map(|p| p.timeout_ms))
                .unwrap_or(settings.request_timeout_ms),
            attempt_timeout_ms: self.attempt_timeout.unwrap_or(settings.attempt_timeout_ms),
            rate_limit: self
                .rate_limit
                .or(profile.map(|p| p.rate_limit))
                .unwrap_or(settings.default_rate_limit),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| settings.user_agent.clone()),
            output,
        }
    }

    /// Gather the four host lists from files and inline values.
    fn input_lists(&self) -> ValidationResult<InputLists> {
        let ip_entries = collect_entries(self.ips.as_deref(), &self.ip)?;

        Ok(InputLists {
            ips: parse_ips(&ip_entries)?,
            base_domains: collect_entries(self.domains.as_deref(), &self.domain)?,
            prefixes: collect_entries(self.prefixes.as_deref(), &self.prefix)?,
            subdomains: collect_entries(self.subdomains.as_deref(), &self.subdomain)?,
        })
    }
}

/// File entries first, then inline values.
fn collect_entries(file: Option<&Path>, inline: &[String]) -> ValidationResult<Vec<String>> {
    let mut entries = match file {
        Some(path) => read_list_file(path)?,
        None => Vec::new(),
    };
    entries.extend(
        inline
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string),
    );
    Ok(entries)
}

/// Distinct hostnames a run will try, before ports and IPs multiply them.
fn hostname_count(inputs: &InputLists) -> usize {
    inputs.subdomains.len() + inputs.base_domains.len() * inputs.prefixes.len()
}
