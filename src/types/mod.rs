//! Core type definitions using newtype patterns for type safety.
//!
//! These types keep invalid ports and malformed inputs out of the probing
//! engine: everything is validated before a run starts.

mod input;
mod port;
mod target;

pub use input::{parse_ips, parse_lines, read_list_file, InputLists, MAX_CIDR_HOSTS};
pub use port::{Port, PortList};
pub use target::{generate, ProbeTarget};
