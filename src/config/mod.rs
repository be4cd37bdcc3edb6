use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Artificial delay applied to every stub call
    pub latency_ms: u64,
    /// Bridge-level timeout per call
    pub timeout_ms: u64,
    /// Fail every n-th call; 0 disables fault injection
    pub fail_every: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            latency_ms: 350,
            timeout_ms: 5_000,
            fail_every: 0,
        }
    }
}

impl ServiceConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    pub fn fail_every(&self) -> Option<u64> {
        (self.fail_every > 0).then_some(self.fail_every)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
    pub dir: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tick_rate_ms: u64,
    pub export_dir: Option<String>,
    pub service: ServiceConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 200,
            export_dir: None,
            service: ServiceConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log
            .dir
            .as_deref()
            .and_then(expand_path)
            .or_else(data_dir)
            .unwrap_or_else(|| PathBuf::from(".clone-os"))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .and_then(expand_path)
            .or_else(|| data_dir().map(|dir| dir.join("exports")))
            .unwrap_or_else(|| PathBuf::from(".clone-os").join("exports"))
    }
}

/// Failure to read or parse a config file that exists.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load from the default location. No config file means defaults.
pub fn load() -> Result<Config, ConfigError> {
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };
    load_from(&path)
}

/// A missing file yields defaults; an unreadable or malformed one is an
/// error so the caller can report it once logging is up.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CLONE_OS_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("clone-os").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("clone-os").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "clone-os", "clone-os")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("clone-os"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("clone-os"));
    }
    directories::ProjectDirs::from("io", "clone-os", "clone-os")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn expand_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return Some(home.join(rest));
        }
    }

    Some(PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tick_rate(), Duration::from_millis(200));
        assert_eq!(config.service.fail_every(), None);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_parse_partial_file() {
        let config = parse(
            r#"
            tick_rate_ms = 100
            [service]
            fail_every = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_rate_ms, 100);
        assert_eq!(config.service.fail_every(), Some(3));
        assert_eq!(config.service.latency_ms, 350);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "tick_rate_ms = \"fast\"").unwrap();

        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = load_from(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.service.timeout_ms, 5_000);
    }

    #[test]
    fn test_explicit_export_dir() {
        let config = parse("export_dir = \"/tmp/vault-exports\"").unwrap();
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/vault-exports"));
    }

    #[test]
    fn test_expand_path_rejects_blank() {
        assert_eq!(expand_path("   "), None);
        assert_eq!(expand_path("/a/b"), Some(PathBuf::from("/a/b")));
    }
}
