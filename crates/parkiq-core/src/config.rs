//! Configuration loading and typed config structures for ParkIQ.
//!
//! The canonical configuration lives in `parkiq-config.yaml` next to the
//! binary's working directory. Every field has a default, so a missing
//! file (or a missing section) yields a runnable configuration.
//!
//! Capacity and the listen address are fixed for the lifetime of the
//! process; nothing here is reloaded at runtime.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "parkiq-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value was parsed but is not acceptable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field (or env variable name).
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `parkiq-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParkIqConfig {
    /// Facility parameters.
    #[serde(default)]
    pub facility: FacilityConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Durable store settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl ParkIqConfig {
    /// Load configuration for the running process.
    ///
    /// Reads `path` if it exists and falls back to defaults otherwise,
    /// then applies environment overrides:
    /// - `PARKIQ_CAPACITY` overrides `facility.capacity`
    /// - `PARKIQ_HOST` overrides `server.host`
    /// - `PARKIQ_PORT` overrides `server.port`
    /// - `PARKIQ_DATA_PATH` overrides `storage.data_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Yaml`] if an existing
    /// file cannot be read or parsed, and [`ConfigError::Invalid`] if an
    /// override is malformed or the result fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::read_file(path)?
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Apply `PARKIQ_*` overrides using `lookup` to resolve variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric override does not parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("PARKIQ_CAPACITY") {
            self.facility.capacity = parse_override("PARKIQ_CAPACITY", &raw)?;
        }
        if let Some(host) = lookup("PARKIQ_HOST") {
            self.server.host = host;
        }
        if let Some(raw) = lookup("PARKIQ_PORT") {
            self.server.port = parse_override("PARKIQ_PORT", &raw)?;
        }
        if let Some(path) = lookup("PARKIQ_DATA_PATH") {
            self.storage.data_path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Check invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero capacity, an empty
    /// data path, or a host/port pair that is not a socket address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.facility.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: String::from("facility.capacity"),
                reason: String::from("must be greater than zero"),
            });
        }
        if self.storage.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: String::from("storage.data_path"),
                reason: String::from("must not be empty"),
            });
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

fn parse_override<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        field: key.to_owned(),
        reason: format!("{raw:?}: {e}"),
    })
}

/// Facility configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacilityConfig {
    /// Total number of parking slots. Must be positive.
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Resolve the configured host and port into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `host:port` does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid {
                field: String::from("server.host"),
                reason: format!("invalid address {}:{}: {e}", self.host, self.port),
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Durable store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON occupancy record.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

const fn default_capacity() -> u32 {
    10
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    3000
}

fn default_data_path() -> PathBuf {
    PathBuf::from("parking-data.json")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ParkIqConfig::default();
        assert_eq!(config.facility.capacity, 10);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.data_path, PathBuf::from("parking-data.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
facility:
  capacity: 42
server:
  host: 127.0.0.1
  port: 8081
storage:
  data_path: /var/lib/parkiq/occupancy.json
";
        let config = ParkIqConfig::parse(yaml).unwrap();
        assert_eq!(config.facility.capacity, 42);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8081);
        assert_eq!(
            config.storage.data_path,
            PathBuf::from("/var/lib/parkiq/occupancy.json")
        );
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = ParkIqConfig::parse("facility:\n  capacity: 5\n").unwrap();
        assert_eq!(config.facility.capacity, 5);
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = ParkIqConfig::parse("facility:\n  capacity: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "facility.capacity"));
    }

    #[test]
    fn bad_host_is_rejected() {
        let err = ParkIqConfig::parse("server:\n  host: not an address\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let err = ParkIqConfig::parse("facility: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let vars: BTreeMap<&str, &str> = [
            ("PARKIQ_CAPACITY", "25"),
            ("PARKIQ_HOST", "127.0.0.1"),
            ("PARKIQ_PORT", "9000"),
            ("PARKIQ_DATA_PATH", "/tmp/occupancy.json"),
        ]
        .into_iter()
        .collect();

        let mut config = ParkIqConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| (*v).to_owned()))
            .unwrap();

        assert_eq!(config.facility.capacity, 25);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.data_path, PathBuf::from("/tmp/occupancy.json"));
    }

    #[test]
    fn malformed_port_override_is_rejected() {
        let mut config = ParkIqConfig::default();
        let err = config
            .apply_overrides(|key| (key == "PARKIQ_PORT").then(|| String::from("eighty")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "PARKIQ_PORT"));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parkiq-config.yaml");
        std::fs::write(&path, "facility:\n  capacity: 7\n").unwrap();

        let config = ParkIqConfig::read_file(&path).unwrap();
        assert_eq!(config.facility.capacity, 7);
    }
}
