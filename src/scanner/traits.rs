//! Prober trait abstraction.
//!
//! Defines the seam between the orchestrator and the network: the
//! orchestrator only needs something that turns a target into an optional
//! result, which keeps it testable without sockets.

use crate::types::{Port, ProbeTarget};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Evidence that an IP answered for a hostname.
///
/// Field names double as the export column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionResult {
    /// URL that was requested (`scheme://ip:port`).
    #[serde(rename = "URL")]
    pub url: String,
    /// Hostname sent in the `Host` header.
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "IP")]
    pub ip: IpAddr,
    #[serde(rename = "Port")]
    pub port: Port,
    /// Text of the first `<title>`, empty when absent.
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Status of the direct response (redirects are not followed).
    #[serde(rename = "StatusCode")]
    pub status_code: u16,
    /// Raw body length in bytes.
    #[serde(rename = "ContentLength")]
    pub content_length: u64,
}

impl CollisionResult {
    /// Check whether this result belongs to the given target.
    pub fn matches(&self, target: &ProbeTarget) -> bool {
        self.domain == target.hostname && self.ip == target.ip && self.port == target.port
    }
}

/// Trait for probe implementations.
///
/// A prober never fails: transport problems are absorbed and reported as
/// `None`, meaning "no collision evidence for this target".
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one target.
    async fn probe(&self, target: &ProbeTarget) -> Option<CollisionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_matches_target() {
        let target = ProbeTarget::new("www.example.com", "10.0.0.1".parse().unwrap(), Port::HTTP);
        let result = CollisionResult {
            url: "http://10.0.0.1:80".to_string(),
            domain: "www.example.com".to_string(),
            ip: "10.0.0.1".parse().unwrap(),
            port: Port::HTTP,
            title: String::new(),
            status_code: 301,
            content_length: 0,
        };
        assert!(result.matches(&target));

        let other = ProbeTarget::new("www.example.com", "10.0.0.1".parse().unwrap(), Port::HTTPS);
        assert!(!result.matches(&other));
    }
}
