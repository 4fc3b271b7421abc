// Talos node OS status via talosctl (version, services, thermal zone)

mod parse;
mod unavailable;

pub use unavailable::UnavailableNodeOs;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::config::TalosConfig;
use crate::error::ProviderError;
use crate::models::NodeOsStatus;
use crate::provider::NodeOsStatusProvider;

pub struct TalosRepo {
    talosctl: String,
    config_path: PathBuf,
    endpoint: Option<String>,
    thermal_zone: String,
}

impl TalosRepo {
    /// Fails when the talosconfig is not mounted.
    pub fn connect(config: &TalosConfig) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(&config.config_path);
        anyhow::ensure!(
            config_path.is_file(),
            "talosconfig not found at {}",
            config_path.display()
        );
        Ok(Self {
            talosctl: config.talosctl.clone(),
            config_path,
            endpoint: config.endpoint.clone(),
            thermal_zone: config.thermal_zone.clone(),
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Runs talosctl and returns stdout. The child is killed if the future is dropped.
    async fn run(&self, args: &[&str]) -> Result<String, ProviderError> {
        let command = format!("{} {}", self.talosctl, args.join(" "));
        let output = Command::new(&self.talosctl)
            .arg("--talosconfig")
            .arg(&self.config_path)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProviderError::Command {
                command: command.clone(),
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(ProviderError::Command {
                command,
                message: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Appends `--nodes <endpoint>` for cluster-wide queries when an endpoint is configured.
    async fn run_cluster(&self, args: &[&str]) -> Result<String, ProviderError> {
        match self.endpoint.as_deref() {
            Some(node) => {
                let mut with_node = args.to_vec();
                with_node.extend(["--nodes", node]);
                self.run(&with_node).await
            }
            None => self.run(args).await,
        }
    }
}

#[async_trait]
impl NodeOsStatusProvider for TalosRepo {
    #[instrument(skip(self), fields(repo = "talos", operation = "get_node_os_status"))]
    async fn get_node_os_status(&self) -> Result<NodeOsStatus, ProviderError> {
        let (version, services) =
            tokio::try_join!(self.get_version(), self.run_cluster(&["services"]))?;
        let services = parse::parse_services(&services);
        let healthy = parse::services_healthy(&services);
        Ok(NodeOsStatus {
            version,
            cluster_health: if healthy { "Healthy" } else { "Degraded" }.into(),
            services,
            healthy,
        })
    }

    #[instrument(skip(self), fields(repo = "talos", operation = "get_version"))]
    async fn get_version(&self) -> Result<String, ProviderError> {
        let out = self.run_cluster(&["version"]).await?;
        parse::parse_server_tag(&out).ok_or_else(|| ProviderError::Parse {
            what: "talosctl version",
            message: "no server tag in output".into(),
        })
    }

    #[instrument(skip(self), fields(repo = "talos", operation = "get_node_temperature"))]
    async fn get_node_temperature(&self, node_ip: &str) -> Result<Option<f64>, ProviderError> {
        match self
            .run(&["read", self.thermal_zone.as_str(), "--nodes", node_ip])
            .await
        {
            Ok(out) => Ok(parse::parse_millicelsius(&out)),
            Err(e) => {
                debug!(error = %e, "thermal zone read failed");
                Ok(None)
            }
        }
    }
}
