//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend URL used when nothing else is configured
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

/// Environment variable that relocates every gearguard directory
pub const HOME_ENV: &str = "GEARGUARD_HOME";

/// GearGuard configuration with layered hierarchy
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Page size for list commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Retries for read requests after a transport failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_retries: Option<u32>,

    /// HTTP timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// How long cached responses stay fresh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (applied by the accessors)

        // 2. Global user config (~/.config/gearguard/config.yaml)
        if let Some(path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&path) {
                config.merge(global);
            }
        }

        // 3. Environment variables
        config.apply_env();

        config
    }

    /// Parse a config file, ignoring it when missing or malformed
    pub fn read_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(server) = std::env::var("GEARGUARD_SERVER") {
            if !server.trim().is_empty() {
                self.server = Some(server);
            }
        }
        if let Ok(format) = std::env::var("GEARGUARD_FORMAT") {
            self.default_format = Some(format);
        }
        if let Ok(ttl) = std::env::var("GEARGUARD_CACHE_TTL") {
            if let Ok(ttl) = ttl.parse() {
                self.cache_ttl_secs = Some(ttl);
            }
        }
    }

    /// Path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.server.is_some() {
            self.server = other.server;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if other.read_retries.is_some() {
            self.read_retries = other.read_retries;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.cache_ttl_secs.is_some() {
            self.cache_ttl_secs = other.cache_ttl_secs;
        }
    }

    /// Apply a `--server` flag on top of everything else
    pub fn with_server_override(mut self, server: Option<String>) -> Self {
        if server.is_some() {
            self.server = server;
        }
        self
    }

    /// Backend URL without a trailing slash
    pub fn server(&self) -> String {
        self.server
            .as_deref()
            .unwrap_or(DEFAULT_SERVER)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(100).clamp(1, 1000)
    }

    pub fn read_retries(&self) -> u32 {
        self.read_retries.unwrap_or(1)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(30)
    }

    pub fn cache_ttl_secs(&self) -> u64 {
        self.cache_ttl_secs.unwrap_or(300)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "gearguard")
}

fn home_override() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Directory holding `config.yaml`
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = home_override() {
        return Some(home.join("config"));
    }
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Directory holding the response cache
pub fn cache_dir() -> Option<PathBuf> {
    if let Some(home) = home_override() {
        return Some(home.join("cache"));
    }
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding the session file
pub fn data_dir() -> Option<PathBuf> {
    if let Some(home) = home_override() {
        return Some(home.join("data"));
    }
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server(), DEFAULT_SERVER);
        assert_eq!(config.page_size(), 100);
        assert_eq!(config.read_retries(), 1);
        assert_eq!(config.cache_ttl_secs(), 300);
    }

    #[test]
    fn test_merge_other_wins() {
        let mut base = Config {
            server: Some("http://a".to_string()),
            page_size: Some(50),
            ..Default::default()
        };
        base.merge(Config {
            server: Some("http://b".to_string()),
            ..Default::default()
        });
        assert_eq!(base.server(), "http://b");
        assert_eq!(base.page_size(), 50);
    }

    #[test]
    fn test_server_override_and_trailing_slash() {
        let config = Config::default().with_server_override(Some("http://gg.local:9000/".to_string()));
        assert_eq!(config.server(), "http://gg.local:9000");

        let untouched = Config::default().with_server_override(None);
        assert_eq!(untouched.server(), DEFAULT_SERVER);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let config = Config {
            page_size: Some(5000),
            ..Default::default()
        };
        assert_eq!(config.page_size(), 1000);
    }

    #[test]
    fn test_read_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "server: http://plant-7:8000\ncache_ttl_secs: 60\n").unwrap();

        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.server(), "http://plant-7:8000");
        assert_eq!(config.cache_ttl_secs(), 60);

        std::fs::write(&path, "server: [unclosed").unwrap();
        assert!(Config::read_file(&path).is_none());
        assert!(Config::read_file(&tmp.path().join("missing.yaml")).is_none());
    }
}
