//! Probe targets and their generation.
//!
//! A run probes the cross-product of candidate hostnames, IPs and ports.
//! Hostnames come from two sources: literal subdomains, and every
//! `prefix.base_domain` combination.

use super::port::Port;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// One (hostname, ip, port) triple to be probed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeTarget {
    /// Name sent in the `Host` header.
    pub hostname: String,
    /// Address the connection is made to.
    pub ip: IpAddr,
    /// Port the connection is made to.
    pub port: Port,
}

impl ProbeTarget {
    /// Create a new probe target.
    pub fn new(hostname: impl Into<String>, ip: IpAddr, port: Port) -> Self {
        Self {
            hostname: hostname.into(),
            ip,
            port,
        }
    }

    /// The socket address the probe connects to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port.as_u16())
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.hostname, self.socket_addr())
    }
}

/// Expand the input lists into the ordered target list of a run.
///
/// Subdomain-derived targets come first (subdomain, ip, port order), then
/// prefix-derived ones (base domain, prefix, ip, port order). Duplicates
/// produced by both rules are kept and probed independently.
pub fn generate(
    ips: &[IpAddr],
    base_domains: &[String],
    prefixes: &[String],
    subdomains: &[String],
    ports: &[Port],
) -> Vec<ProbeTarget> {
    let per_host = ips.len() * ports.len();
    let capacity = (subdomains.len() + base_domains.len() * prefixes.len()) * per_host;
    let mut targets = Vec::with_capacity(capacity);

    let synthesized = base_domains.iter().flat_map(|base| {
        prefixes
            .iter()
            .map(move |prefix| format!("{}.{}", prefix, base))
    });

    let hostnames = subdomains.iter().cloned().chain(synthesized);

    for hostname in hostnames {
        for &ip in ips {
            for &port in ports {
                targets.push(ProbeTarget::new(hostname.clone(), ip, port));
            }
        }
    }

    targets
}
