// Aggregated cluster snapshot (unit of caching and of the /metrics/json response)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApplicationStatus, GitOpsStatus, HardwareStatus, NodeOsStatus, OrchestratorStatus};

/// Best known cluster state as of `updated_at`. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub hardware: HardwareStatus,
    #[serde(rename = "talos")]
    pub node_os: NodeOsStatus,
    #[serde(rename = "kubernetes")]
    pub orchestrator: OrchestratorStatus,
    #[serde(rename = "flux")]
    pub gitops: GitOpsStatus,
    pub applications: Vec<ApplicationStatus>,
    pub updated_at: DateTime<Utc>,
}
