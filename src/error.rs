//! Error types for hostcollide.
//!
//! Uses `thiserror` for ergonomic error definitions. Probe errors never leave
//! a single attempt; only validation, configuration and report errors reach
//! the command line.

use std::path::PathBuf;
use thiserror::Error;

/// Transport-level failure of one probe attempt.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("connection refused")]
    ConnectionRefused,

    #[error("request timed out")]
    Timeout,

    #[error("TLS negotiation failed: {0}")]
    Tls(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("connection failed for {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Timeout;
        }
        if e.is_body() || e.is_decode() {
            return Self::Body(e.to_string());
        }
        if e.is_builder() {
            return Self::Client(e.to_string());
        }

        // reqwest folds refused/reset/TLS into connect errors; the source
        // chain is the only place the distinction survives.
        let mut chain = String::new();
        let mut source: Option<&dyn std::error::Error> = Some(&e);
        while let Some(err) = source {
            chain.push_str(&err.to_string().to_lowercase());
            chain.push(' ');
            source = err.source();
        }

        if chain.contains("refused") {
            Self::ConnectionRefused
        } else if chain.contains("tls") || chain.contains("certificate") || chain.contains("handshake") {
            Self::Tls(e.to_string())
        } else {
            Self::ConnectionFailed {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: e.to_string(),
            }
        }
    }
}

/// Result type alias for probe attempts.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Input problems detected before a run starts.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("no IP addresses given (use --ip or --ips)")]
    NoIps,

    #[error("no domain source given (use --domain/--domains or --subdomain/--subdomains)")]
    NoDomainSource,

    #[error("concurrency must be between {min} and {max}, got {value}")]
    Concurrency { value: usize, min: usize, max: usize },

    #[error("port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u32),

    #[error("invalid port range: start ({0}) > end ({1})")]
    PortRange(u16, u16),

    #[error("invalid IP address or CIDR range: {0}")]
    InvalidIp(String),

    #[error("CIDR range too large: {0} addresses (max: {1})")]
    CidrTooLarge(u128, u128),

    #[error("failed to read list file {path}: {reason}")]
    ListFile { path: PathBuf, reason: String },

    #[error("no targets generated")]
    NoTargets,

    #[error("{name} must be greater than zero")]
    ZeroTimeout { name: &'static str },
}

/// Result type alias for input validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Profile management errors.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profile '{0}' not found")]
    NotFound(String),

    #[error("profile '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid profile: {0}")]
    Invalid(String),

    #[error("failed to save profile: {0}")]
    SaveFailed(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Report export errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write report {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Top-level error for command execution.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
