// Upstream capabilities consumed by the metrics collector.
// Live clients and stand-ins implement the same traits.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{
    ApplicationStatus, GitOpsStatus, NodeDetail, NodeOsStatus, OrchestratorStatus,
};

/// Orchestration-layer queries (nodes, workloads, GitOps).
#[async_trait]
pub trait ClusterStatusProvider: Send + Sync {
    /// Node inventory with CPU/memory usage filled in where metrics are available.
    async fn get_node_details(&self) -> Result<Vec<NodeDetail>, ProviderError>;

    async fn get_orchestrator_status(&self) -> Result<OrchestratorStatus, ProviderError>;

    /// Workloads carrying the monitor label.
    async fn get_application_statuses(&self) -> Result<Vec<ApplicationStatus>, ProviderError>;

    async fn get_gitops_status(&self) -> Result<GitOpsStatus, ProviderError>;
}

/// Node operating-system queries (service health, temperature).
#[async_trait]
pub trait NodeOsStatusProvider: Send + Sync {
    async fn get_node_os_status(&self) -> Result<NodeOsStatus, ProviderError>;

    async fn get_version(&self) -> Result<String, ProviderError>;

    /// Celsius; `Ok(None)` when no measurement is available.
    async fn get_node_temperature(&self, node_ip: &str) -> Result<Option<f64>, ProviderError>;
}
