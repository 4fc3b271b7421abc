// Talos (node OS) status

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOsStatus {
    pub version: String,
    pub cluster_health: String,
    /// Service name -> state (e.g. "kubelet" -> "Running").
    pub services: BTreeMap<String, String>,
    pub healthy: bool,
}

impl NodeOsStatus {
    /// Placeholder used when the node OS layer cannot be queried.
    pub fn unknown() -> Self {
        Self {
            version: "Unknown".into(),
            cluster_health: "Unknown".into(),
            services: BTreeMap::new(),
            healthy: false,
        }
    }
}
