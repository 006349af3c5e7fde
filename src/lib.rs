//! # hostcollide - Virtual-Host Collision Prober
//!
//! hostcollide finds web servers that answer for hostnames DNS does not point
//! at them. Every candidate hostname is sent, in the `Host` header, straight
//! to every IP on every port; any response counts as a collision.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: A fixed number of probes in flight, with an
//!   optional request rate limit
//! - **Cooperative Stop**: No new targets after a stop; in-flight probes drain
//! - **Flexible Inputs**: IP lists with CIDR ranges, base domains with
//!   prefixes, and complete hostnames
//! - **Scan Profiles**: Save and reuse port lists and timing
//! - **Reports**: CSV or JSON files written at the end of a run
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use hostcollide::scanner::{CollisionScanner, HttpProber, ProbeConfig, ScanJobConfig, StopSignal};
//! use hostcollide::types::{InputLists, PortList};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let inputs = InputLists {
//!         ips: vec!["10.0.0.5".parse()?],
//!         subdomains: vec!["intranet.example.com".to_string()],
//!         ..InputLists::default()
//!     };
//!     let targets = inputs.targets(&PortList::default())?;
//!
//!     let prober = HttpProber::new(&ProbeConfig::default())?;
//!     let mut scanner = CollisionScanner::new(prober, ScanJobConfig::default())?;
//!     scanner.run(targets, &mut (), &StopSignal::new()).await;
//!
//!     for result in scanner.results() {
//!         println!("{} {} {}", result.status_code, result.domain, result.url);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port lists, input lists and target generation
//! - [`scanner`] - The HTTP prober and the bounded-concurrency run
//! - [`config`] - Settings and scan profiles
//! - [`report`] - Run reports written to disk
//! - [`output`] - Terminal and export formatting
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod report;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ProbeError, ValidationError};
pub use report::{ReportFormat, RunReport};
pub use scanner::{CollisionResult, CollisionScanner, HttpProber, Prober, StopSignal};
pub use types::{InputLists, Port, PortList, ProbeTarget};
