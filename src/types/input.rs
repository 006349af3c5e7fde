//! Run inputs: the four host lists and their validation.
//!
//! IP entries may be single addresses (IPv4 or IPv6) or CIDR ranges, which
//! are expanded to their host addresses.

use super::port::PortList;
use super::target::{generate, ProbeTarget};
use crate::error::{ValidationError, ValidationResult};
use ipnetwork::IpNetwork;
use std::fs;
use std::net::IpAddr;
use std::path::Path;

/// Maximum number of hosts allowed in a single CIDR entry.
pub const MAX_CIDR_HOSTS: u128 = 65536;

/// The host lists a run is generated from.
#[derive(Debug, Clone, Default)]
pub struct InputLists {
    pub ips: Vec<IpAddr>,
    pub base_domains: Vec<String>,
    pub prefixes: Vec<String>,
    pub subdomains: Vec<String>,
}

impl InputLists {
    /// Reject inputs that cannot produce a meaningful run.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.ips.is_empty() {
            return Err(ValidationError::NoIps);
        }
        if self.base_domains.is_empty() && self.subdomains.is_empty() {
            return Err(ValidationError::NoDomainSource);
        }
        Ok(())
    }

    /// Validate and expand into the ordered target list.
    pub fn targets(&self, ports: &PortList) -> ValidationResult<Vec<ProbeTarget>> {
        self.validate()?;

        let targets = generate(
            &self.ips,
            &self.base_domains,
            &self.prefixes,
            &self.subdomains,
            ports.as_slice(),
        );

        // Base domains with no prefixes and no subdomains expand to nothing.
        if targets.is_empty() {
            return Err(ValidationError::NoTargets);
        }

        Ok(targets)
    }
}

/// Split newline-delimited text into entries.
///
/// Entries are trimmed; blank lines and `#` comments are dropped.
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read a newline-delimited list file.
pub fn read_list_file(path: &Path) -> ValidationResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| ValidationError::ListFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(parse_lines(&content))
}

/// Parse IP entries, expanding CIDR ranges.
pub fn parse_ips<S: AsRef<str>>(entries: &[S]) -> ValidationResult<Vec<IpAddr>> {
    let mut ips = Vec::new();
    for entry in entries {
        ips.extend(parse_ip_entry(entry.as_ref())?);
    }
    Ok(ips)
}

fn parse_ip_entry(s: &str) -> ValidationResult<Vec<IpAddr>> {
    let s = s.trim();

    if let Ok(ip) = s.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    if !s.contains('/') {
        return Err(ValidationError::InvalidIp(s.to_string()));
    }

    let network: IpNetwork = s
        .parse()
        .map_err(|_| ValidationError::InvalidIp(s.to_string()))?;

    // ipnetwork's size() overflows on /0, so count from the prefix length
    let max_bits: u32 = if network.is_ipv4() { 32 } else { 128 };
    let host_bits = max_bits.saturating_sub(u32::from(network.prefix()));
    let host_count = 1u128.checked_shl(host_bits).unwrap_or(u128::MAX);
    if host_count > MAX_CIDR_HOSTS {
        return Err(ValidationError::CidrTooLarge(host_count, MAX_CIDR_HOSTS));
    }

    let ips = network
        .iter()
        .filter(|ip| {
            // Network and broadcast addresses are not hosts
            if let (IpNetwork::V4(net), IpAddr::V4(addr)) = (network, ip) {
                if net.prefix() < 31 {
                    return *addr != net.network() && *addr != net.broadcast();
                }
            }
            true
        })
        .collect();

    Ok(ips)
}
