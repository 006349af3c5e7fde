//! Application settings and paths.
//!
//! Manages XDG-compliant paths for configuration.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global paths singleton.
static PATHS: OnceLock<Paths> = OnceLock::new();

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/hostcollide)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Get the global paths instance, creating the directories on first use.
    pub fn get() -> ConfigResult<&'static Paths> {
        if let Some(paths) = PATHS.get() {
            return Ok(paths);
        }
        let paths = Self::new()?;
        Ok(PATHS.get_or_init(|| paths))
    }

    fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "hostcollide", "hostcollide")
            .ok_or(ConfigError::DirectoryNotFound)?;

        let paths = Self {
            config_dir: project.config_dir().to_path_buf(),
        };

        fs::create_dir_all(&paths.config_dir)?;

        Ok(paths)
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Get the path to the profiles directory.
    pub fn profiles_dir(&self) -> PathBuf {
        self.config_dir.join("profiles")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default number of probes in flight.
    pub default_concurrency: usize,
    /// Default port list.
    pub default_ports: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Per-target ceiling in milliseconds.
    pub attempt_timeout_ms: u64,
    /// User-Agent sent with every probe.
    pub user_agent: String,
    /// Maximum requests per second, 0 for unlimited.
    pub default_rate_limit: u32,
    /// Default output format.
    pub default_output_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_concurrency: 50,
            default_ports: "80,443".to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            attempt_timeout_ms: DEFAULT_ATTEMPT_TIMEOUT.as_millis() as u64,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_rate_limit: 0,
            default_output_format: "plain".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from an explicit file, or the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let file = Paths::get()?.settings_file();
                if !file.exists() {
                    return Ok(Self::default());
                }
                Self::load_from(&file)
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Save settings to a specific file.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_concurrency, 50);
        assert_eq!(settings.default_ports, "80,443");
        assert_eq!(settings.request_timeout_ms, 10_000);
        assert_eq!(settings.attempt_timeout_ms, 30_000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, r#"{"default_concurrency": 200}"#).unwrap();

        let settings = AppSettings::load(Some(&file)).unwrap();
        assert_eq!(settings.default_concurrency, 200);
        assert_eq!(settings.default_ports, "80,443");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        let settings = AppSettings {
            default_rate_limit: 25,
            ..AppSettings::default()
        };

        settings.save_to(&file).unwrap();
        let loaded = AppSettings::load_from(&file).unwrap();
        assert_eq!(loaded.default_rate_limit, 25);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = AppSettings::load(Some(Path::new("/nonexistent/hostcollide.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, "not json").unwrap();
        assert!(matches!(
            AppSettings::load_from(&file),
            Err(ConfigError::InvalidFormat(_))
        ));
    }
}
