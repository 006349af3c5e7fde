//! Scan profile management.
//!
//! Profiles save a port list with the concurrency and timing that suit it.

use crate::error::{ConfigError, ProfileError, ProfileResult};
use crate::scanner::ScanJobConfig;
use crate::types::PortList;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use super::settings::Paths;

/// A saved scan profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name (used as identifier).
    pub name: String,
    /// Description of this profile.
    #[serde(default)]
    pub description: String,
    /// Port list string.
    pub ports: String,
    /// Probes in flight.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Requests per second, 0 for unlimited.
    #[serde(default)]
    pub rate_limit: u32,
}

fn default_concurrency() -> usize {
    50
}

fn default_timeout() -> u64 {
    10_000
}

impl Profile {
    /// Create a new profile with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            ports: "80,443".to_string(),
            concurrency: default_concurrency(),
            timeout_ms: default_timeout(),
            rate_limit: 0,
        }
    }

    /// Parse the port list.
    pub fn port_list(&self) -> ProfileResult<PortList> {
        Ok(PortList::parse(&self.ports)?)
    }

    /// Validate the profile configuration.
    pub fn validate(&self) -> ProfileResult<()> {
        if self.name.is_empty() {
            return Err(ProfileError::Invalid("name cannot be empty".to_string()));
        }

        if !self.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(ProfileError::Invalid(
                "name can only contain alphanumeric characters, hyphens, and underscores".to_string(),
            ));
        }

        self.port_list()?;
        ScanJobConfig::default()
            .with_concurrency(self.concurrency)
            .validate()?;

        if self.timeout_ms == 0 {
            return Err(ProfileError::Invalid("timeout must be positive".to_string()));
        }

        Ok(())
    }
}

/// Built-in profile presets.
impl Profile {
    /// The classic pair of web ports.
    pub fn default_profile() -> Self {
        Self {
            name: "default".to_string(),
            description: "Ports 80 and 443".to_string(),
            ..Self::new("default")
        }
    }

    /// Common web service ports, including alternates.
    pub fn web() -> Self {
        Self {
            name: "web".to_string(),
            description: "Common web service ports".to_string(),
            ports: "80,443,8000,8080,8443,8888,3000,5000,9000,9090".to_string(),
            concurrency: 100,
            timeout_ms: 10_000,
            rate_limit: 0,
        }
    }

    /// High concurrency with a short timeout.
    pub fn fast() -> Self {
        Self {
            name: "fast".to_string(),
            description: "High concurrency, short timeout".to_string(),
            ports: "80,443".to_string(),
            concurrency: 500,
            timeout_ms: 5_000,
            rate_limit: 0,
        }
    }

    /// Low and slow, for fragile or monitored targets.
    pub fn gentle() -> Self {
        Self {
            name: "gentle".to_string(),
            description: "Low concurrency, rate limited".to_string(),
            ports: "80,443,8080,8443".to_string(),
            concurrency: 10,
            timeout_ms: 15_000,
            rate_limit: 20,
        }
    }

    /// Get all built-in profiles.
    pub fn builtins() -> Vec<Profile> {
        vec![Self::default_profile(), Self::web(), Self::fast(), Self::gentle()]
    }

    /// Check whether a name belongs to a built-in profile.
    pub fn is_builtin(name: &str) -> bool {
        Self::builtins().iter().any(|p| p.name == name)
    }
}

/// Manages profile storage and retrieval.
pub struct ProfileManager {
    profiles_dir: PathBuf,
    cache: BTreeMap<String, Profile>,
}

impl ProfileManager {
    /// Create a profile manager over the default profiles directory.
    pub fn new() -> ProfileResult<Self> {
        let paths = Paths::get()?;
        Self::with_dir(paths.profiles_dir())
    }

    /// Create a profile manager over a specific directory.
    pub fn with_dir(profiles_dir: PathBuf) -> ProfileResult<Self> {
        fs::create_dir_all(&profiles_dir).map_err(|e| {
            ProfileError::Config(ConfigError::WriteFailed {
                path: profiles_dir.clone(),
                reason: e.to_string(),
            })
        })?;

        let mut manager = Self {
            profiles_dir,
            cache: BTreeMap::new(),
        };
        manager.load_all()?;

        Ok(manager)
    }

    /// Get a profile by name.
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.cache.get(name)
    }

    /// List all available profiles, sorted by name.
    pub fn list(&self) -> Vec<&Profile> {
        self.cache.values().collect()
    }

    /// Create a new profile.
    pub fn create(&mut self, profile: Profile) -> ProfileResult<()> {
        profile.validate()?;

        if self.cache.contains_key(&profile.name) {
            return Err(ProfileError::AlreadyExists(profile.name.clone()));
        }

        self.save_profile(&profile)?;
        self.cache.insert(profile.name.clone(), profile);

        Ok(())
    }

    /// Delete a user profile.
    pub fn delete(&mut self, name: &str) -> ProfileResult<()> {
        if Profile::is_builtin(name) {
            return Err(ProfileError::Invalid(
                "cannot delete built-in profile".to_string(),
            ));
        }

        if !self.cache.contains_key(name) {
            return Err(ProfileError::NotFound(name.to_string()));
        }

        let file = self.profile_file(name);
        if file.exists() {
            fs::remove_file(&file).map_err(|e| ProfileError::SaveFailed(e.to_string()))?;
        }

        self.cache.remove(name);

        Ok(())
    }

    /// Load built-ins, then user profiles over them.
    fn load_all(&mut self) -> ProfileResult<()> {
        for profile in Profile::builtins() {
            self.cache.insert(profile.name.clone(), profile);
        }

        for entry in
            fs::read_dir(&self.profiles_dir).map_err(|e| ProfileError::SaveFailed(e.to_string()))?
        {
            let entry = entry.map_err(|e| ProfileError::SaveFailed(e.to_string()))?;
            let path = entry.path();

            if path.extension().map_or(false, |ext| ext == "json") {
                let Ok(content) = fs::read_to_string(&path) else {
                    continue;
                };
                match serde_json::from_str::<Profile>(&content) {
                    Ok(profile) => {
                        self.cache.insert(profile.name.clone(), profile);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable profile");
                    }
                }
            }
        }

        Ok(())
    }

    fn save_profile(&self, profile: &Profile) -> ProfileResult<()> {
        let file = self.profile_file(&profile.name);
        let content = serde_json::to_string_pretty(profile)
            .map_err(|e| ProfileError::SaveFailed(e.to_string()))?;

        fs::write(&file, content).map_err(|e| ProfileError::SaveFailed(e.to_string()))
    }

    fn profile_file(&self, name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{}.json", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, ProfileManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = ProfileManager::with_dir(dir.path().join("profiles")).unwrap();
        (dir, manager)
    }

    #[test]
    fn test_profile_validation() {
        let mut profile = Profile::new("test");
        assert!(profile.validate().is_ok());

        profile.name = "".to_string();
        assert!(profile.validate().is_err());

        profile.name = "test!@#".to_string();
        assert!(profile.validate().is_err());

        let mut profile = Profile::new("too-many");
        profile.concurrency = 5000;
        assert!(matches!(profile.validate(), Err(ProfileError::Validation(_))));

        let mut profile = Profile::new("bad-port");
        profile.ports = "80,99999".to_string();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_builtin_profiles_are_valid() {
        for profile in Profile::builtins() {
            assert!(profile.validate().is_ok(), "{} is invalid", profile.name);
        }
    }

    #[test]
    fn test_create_get_delete() {
        let (_dir, mut manager) = manager();
        let mut profile = Profile::new("internal");
        profile.ports = "80,8080".to_string();

        manager.create(profile.clone()).unwrap();
        assert_eq!(manager.get("internal"), Some(&profile));
        assert!(matches!(
            manager.create(profile),
            Err(ProfileError::AlreadyExists(_))
        ));

        manager.delete("internal").unwrap();
        assert!(manager.get("internal").is_none());
        assert!(matches!(
            manager.delete("internal"),
            Err(ProfileError::NotFound(_))
        ));
    }

    #[test]
    fn test_user_profiles_persist() {
        let dir = tempfile::tempdir().unwrap();
        let profiles_dir = dir.path().join("profiles");

        let mut manager = ProfileManager::with_dir(profiles_dir.clone()).unwrap();
        manager.create(Profile::new("saved")).unwrap();

        let reloaded = ProfileManager::with_dir(profiles_dir).unwrap();
        assert!(reloaded.get("saved").is_some());
        assert!(reloaded.get("web").is_some());
    }

    #[test]
    fn test_cannot_delete_builtin() {
        let (_dir, mut manager) = manager();
        assert!(matches!(manager.delete("web"), Err(ProfileError::Invalid(_))));
    }
}
