//! Configuration management for hostcollide.
//!
//! Provides XDG-compliant settings storage and saved scan profiles.

mod profiles;
mod settings;

pub use profiles::{Profile, ProfileManager};
pub use settings::{AppSettings, Paths};
