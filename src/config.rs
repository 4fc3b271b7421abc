use serde::Deserialize;
use std::time::Duration;

use crate::collector::CollectorConfig;
use crate::models::HardwareSpec;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub upstream: UpstreamConfig,
    pub kubernetes: KubernetesConfig,
    pub talos: TalosConfig,
    pub hardware: HardwareSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Deadline for requests that need a snapshot (/metrics/*, /readiness).
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Snapshot time-to-live; 0 re-polls on every request.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Per-call bound on each provider query made during an aggregation pass.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    /// Label selector for workloads shown in the applications table.
    pub monitor_label: String,
    pub flux_namespace: String,
    pub request_timeout_secs: u64,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            monitor_label: "dashboard.monitor=true".into(),
            flux_namespace: "flux-system".into(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TalosConfig {
    pub config_path: String,
    /// talosctl binary (name on PATH or absolute path).
    pub talosctl: String,
    /// Node used for cluster-wide queries; talosconfig default when unset.
    pub endpoint: Option<String>,
    pub thermal_zone: String,
}

impl Default for TalosConfig {
    fn default() -> Self {
        Self {
            config_path: "/var/run/secrets/talos.dev/config".into(),
            talosctl: "talosctl".into(),
            endpoint: None,
            thermal_zone: "/sys/class/thermal/thermal_zone0/temp".into(),
        }
    }
}

impl AppConfig {
    /// Reads `CONFIG_FILE` (default `config.toml`). Falls back to built-in
    /// defaults only when `CONFIG_FILE` is unset and `config.toml` is absent.
    /// `PORT` overrides `server.port`.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_str(&std::fs::read_to_string(&path)?)?,
            Err(_) => match std::fs::read_to_string(DEFAULT_CONFIG_PATH) {
                Ok(s) => Self::load_from_str(&s)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::info!("no {} found; using defaults", DEFAULT_CONFIG_PATH);
                    AppConfig::default()
                }
                Err(e) => return Err(e.into()),
            },
        };
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a port number, got {:?}: {}", port, e))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.server.request_timeout_secs > 0,
            "server.request_timeout_secs must be > 0, got {}",
            self.server.request_timeout_secs
        );
        anyhow::ensure!(
            self.upstream.timeout_secs > 0,
            "upstream.timeout_secs must be > 0, got {}",
            self.upstream.timeout_secs
        );
        // Inventory then temperatures run back to back, each under the upstream timeout.
        anyhow::ensure!(
            self.server.request_timeout_secs > self.upstream.timeout_secs.saturating_mul(2),
            "server.request_timeout_secs must be > 2 * upstream.timeout_secs, got {} with upstream.timeout_secs = {}",
            self.server.request_timeout_secs,
            self.upstream.timeout_secs
        );
        anyhow::ensure!(
            !self.kubernetes.monitor_label.is_empty(),
            "kubernetes.monitor_label must be non-empty"
        );
        anyhow::ensure!(
            !self.kubernetes.flux_namespace.is_empty(),
            "kubernetes.flux_namespace must be non-empty"
        );
        anyhow::ensure!(
            self.kubernetes.request_timeout_secs > 0,
            "kubernetes.request_timeout_secs must be > 0, got {}",
            self.kubernetes.request_timeout_secs
        );
        anyhow::ensure!(
            !self.talos.talosctl.is_empty(),
            "talos.talosctl must be non-empty"
        );
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            cache_ttl: Duration::from_secs(self.cache.ttl_secs),
            upstream_timeout: Duration::from_secs(self.upstream.timeout_secs),
            hardware: self.hardware.clone(),
        }
    }
}
