//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortList` handles the comma-separated port setting of a run.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Plaintext HTTP.
    pub const HTTP: Port = Port(80);
    /// HTTP over TLS.
    pub const HTTPS: Port = Port(443);

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = ValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ValidationError::PortOutOfRange(value as u32))
    }
}

impl TryFrom<u32> for Port {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(ValidationError::PortOutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// The ordered port list of a run.
///
/// Order is preserved and duplicates are kept, so the generated target list
/// mirrors exactly what the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortList(Vec<Port>);

impl PortList {
    /// Ports used when the setting is empty or unparseable.
    pub const DEFAULT: [Port; 2] = [Port::HTTP, Port::HTTPS];

    /// Parse a port list such as `"80,443"` or `"80,8000-8010"`.
    ///
    /// An empty or unparseable list falls back to [`PortList::DEFAULT`];
    /// a number outside 1-65535 or a reversed range is an error.
    pub fn parse(s: &str) -> ValidationResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }

        let mut ports = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let parsed = match part.split_once('-') {
                Some((start, end)) => parse_number(start)
                    .zip(parse_number(end))
                    .map(|(start, end)| expand_range(start, end)),
                None => parse_number(part).map(|n| Port::try_from(n).map(|p| vec![p])),
            };

            match parsed {
                Some(expanded) => ports.extend(expanded?),
                None => {
                    warn!(ports = s, "unparseable port list, falling back to 80,443");
                    return Ok(Self::default());
                }
            }
        }

        if ports.is_empty() {
            return Ok(Self::default());
        }

        Ok(Self(ports))
    }

    /// Get the ports in order.
    pub fn as_slice(&self) -> &[Port] {
        &self.0
    }

    /// Number of ports (duplicates included).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true; an empty list becomes the default list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for PortList {
    fn default() -> Self {
        Self(Self::DEFAULT.to_vec())
    }
}

impl fmt::Display for PortList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

fn parse_number(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}

fn expand_range(start: u32, end: u32) -> ValidationResult<Vec<Port>> {
    let start = Port::try_from(start)?;
    let end = Port::try_from(end)?;
    if start > end {
        return Err(ValidationError::PortRange(start.0, end.0));
    }
    Ok((start.0..=end.0).map(Port).collect())
}
