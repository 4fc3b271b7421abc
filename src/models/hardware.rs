// Node inventory and hardware summary models

use serde::{Deserialize, Serialize};

/// Node role; serializes to "control-plane" / "worker".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    ControlPlane,
    Worker,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::ControlPlane => "control-plane",
            NodeRole::Worker => "worker",
        }
    }
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered node. Usage and temperature are 0.0 when telemetry is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetail {
    pub name: String,
    /// First InternalIP address; empty when the node reports none.
    pub ip: String,
    pub role: NodeRole,
    pub status: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    /// Celsius.
    pub temperature: f64,
    pub is_ready: bool,
}

/// Informational hardware description (not derived from telemetry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareSpec {
    pub total_cpu: String,
    pub total_memory: String,
    pub storage: String,
}

impl Default for HardwareSpec {
    fn default() -> Self {
        Self {
            total_cpu: "4x ARM Cortex-A72 (16 cores total)".into(),
            total_memory: "32GB (4x 8GB)".into(),
            storage: "1TB External SSD".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareStatus {
    pub node_count: usize,
    pub control_planes: usize,
    pub workers: usize,
    pub total_cpu: String,
    pub total_memory: String,
    pub storage: String,
    pub all_nodes_ready: bool,
    pub node_details: Vec<NodeDetail>,
}

impl HardwareStatus {
    /// Tally roles and readiness over the node list.
    /// An empty inventory is never reported as "all nodes ready".
    pub fn from_nodes(nodes: Vec<NodeDetail>, spec: &HardwareSpec) -> Self {
        let control_planes = nodes
            .iter()
            .filter(|n| n.role == NodeRole::ControlPlane)
            .count();
        let all_nodes_ready = !nodes.is_empty() && nodes.iter().all(|n| n.is_ready);
        Self {
            node_count: nodes.len(),
            control_planes,
            workers: nodes.len() - control_planes,
            total_cpu: spec.total_cpu.clone(),
            total_memory: spec.total_memory.clone(),
            storage: spec.storage.clone(),
            all_nodes_ready,
            node_details: nodes,
        }
    }
}
