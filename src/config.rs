//! Configuration types for linkcheckd

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// HTTP server configuration
///
/// Groups settings for the REST API surface. Used as a nested sub-config
/// within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the API server binds to (default: "0.0.0.0:8080")
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for API requests (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; "*" allows any origin (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve interactive Swagger UI at /swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,

    /// Seconds to wait for in-flight requests after a shutdown signal
    /// before the server is torn down (default: 10)
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: false,
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl ServerConfig {
    /// Grace period granted to in-flight requests during shutdown
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Batch store configuration
///
/// Groups settings for batch caching and snapshot persistence. Used as a
/// nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Seconds a batch stays fresh after creation or refresh (default: 60)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Path of the JSON snapshot file written on shutdown and read on
    /// startup (default: "storage.json")
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// When set, a background reaper removes batches whose staleness
    /// exceeds this many TTLs. Unset (the default) disables eviction and
    /// the store grows without bound.
    #[serde(default)]
    pub reap_after_ttl_multiples: Option<u32>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            snapshot_path: default_snapshot_path(),
            reap_after_ttl_multiples: None,
        }
    }
}

impl StoreConfig {
    /// Batch time-to-live
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Link probe configuration
///
/// Groups settings for the outbound reachability checks. Used as a nested
/// sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Per-request timeout in seconds for one probe (default: 5)
    #[serde(default = "default_probe_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of probes in flight at once within one submission
    /// (default: 16)
    #[serde(default = "default_probe_concurrency")]
    pub concurrency: usize,

    /// User-Agent header sent with probe requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout_secs(),
            concurrency: default_probe_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    /// Per-request probe timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Main configuration for linkcheckd
///
/// Fields are organized into logical sub-configs:
/// - [`server`](ServerConfig) — bind address, CORS, shutdown grace
/// - [`store`](StoreConfig) — TTL, snapshot path, eviction
/// - [`probe`](ProbeConfig) — timeout, concurrency, user agent
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Batch store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Probe settings
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error: defaults are returned so the
    /// service works with zero configuration. A present-but-malformed
    /// file is a configuration error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let config: Config = toml::from_str(&contents).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration, rejecting values that would make the
    /// service misbehave silently (zero TTL, zero timeout, zero
    /// concurrency).
    pub fn validate(&self) -> Result<()> {
        if self.store.ttl_secs == 0 {
            return Err(Error::Config {
                message: "batch TTL must be at least one second".to_string(),
                key: Some("store.ttl_secs".to_string()),
            });
        }

        if self.probe.timeout_secs == 0 {
            return Err(Error::Config {
                message: "probe timeout must be at least one second".to_string(),
                key: Some("probe.timeout_secs".to_string()),
            });
        }

        if self.probe.concurrency == 0 {
            return Err(Error::Config {
                message: "probe concurrency must be at least 1".to_string(),
                key: Some("probe.concurrency".to_string()),
            });
        }

        if self.store.reap_after_ttl_multiples == Some(0) {
            return Err(Error::Config {
                message: "reap grace must be at least one TTL".to_string(),
                key: Some("store.reap_after_ttl_multiples".to_string()),
            });
        }

        Ok(())
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_shutdown_grace_secs() -> u64 {
    10
}

fn default_ttl_secs() -> u64 {
    60
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("storage.json")
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_probe_concurrency() -> usize {
    16
}

fn default_user_agent() -> String {
    format!("linkcheckd/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.store.ttl(), Duration::from_secs(60));
        assert_eq!(config.probe.concurrency, 16);
        assert_eq!(config.server.bind_address.port(), 8080);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.snapshot_path, PathBuf::from("storage.json"));
        assert!(config.store.reap_after_ttl_multiples.is_none());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: Config = toml::from_str(
            r#"
            [store]
            ttl_secs = 120
            reap_after_ttl_multiples = 3

            [probe]
            concurrency = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.store.ttl_secs, 120);
        assert_eq!(config.store.reap_after_ttl_multiples, Some(3));
        assert_eq!(config.probe.concurrency, 4);
        // Untouched sections keep their defaults
        assert_eq!(config.probe.timeout_secs, 5);
        assert_eq!(config.server.shutdown_grace_secs, 10);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config: Config = toml::from_str("[store]\nttl_secs = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config { key: Some(k), .. } if k == "store.ttl_secs"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config: Config = toml::from_str("[probe]\nconcurrency = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = Config::load("/definitely/not/a/real/config.toml").unwrap();
        assert_eq!(config.store.ttl_secs, 60);
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not [valid toml").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
