//! Scheme selection per port.

use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::fmt;

/// URL scheme of one probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schemes to attempt for a port, in order.
///
/// 80 is plaintext only and 443 is TLS only; anything else tries http first,
/// then https.
pub fn schemes_for(port: Port) -> &'static [Scheme] {
    match port.as_u16() {
        443 => &[Scheme::Https],
        80 => &[Scheme::Http],
        _ => &[Scheme::Http, Scheme::Https],
    }
}
