// Kubernetes control-plane summary

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    pub version: String,
    /// "<ready>/<total>" control-plane nodes.
    pub control_plane_ready: String,
    /// "<ready>/<total>" worker nodes.
    pub worker_nodes_ready: String,
    pub total_pods: usize,
    pub running_pods: usize,
    pub failed_pods: usize,
    /// Mean over nodes that report usage; 0.0 when none do.
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub healthy: bool,
}
