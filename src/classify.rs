// Node classification and usage math. Pure functions, no I/O.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Node, NodeAddress, NodeCondition};

use crate::models::{NodeRole, OrchestratorStatus};

/// Label whose presence marks a control-plane node.
pub const CONTROL_PLANE_LABEL: &str = "node-role.kubernetes.io/control-plane";

const READY_CONDITION: &str = "Ready";
const INTERNAL_IP: &str = "InternalIP";

/// Role, readiness and address derived from a raw node record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeClass {
    pub name: String,
    pub role: NodeRole,
    pub ready: bool,
    pub internal_ip: String,
}

pub fn node_role(labels: Option<&BTreeMap<String, String>>) -> NodeRole {
    match labels {
        Some(l) if l.contains_key(CONTROL_PLANE_LABEL) => NodeRole::ControlPlane,
        _ => NodeRole::Worker,
    }
}

/// True iff a "Ready" condition exists with status "True".
pub fn is_ready(conditions: &[NodeCondition]) -> bool {
    conditions
        .iter()
        .any(|c| c.type_ == READY_CONDITION && c.status == "True")
}

/// First InternalIP address, or empty.
pub fn internal_ip(addresses: &[NodeAddress]) -> String {
    addresses
        .iter()
        .find(|a| a.type_ == INTERNAL_IP)
        .map(|a| a.address.clone())
        .unwrap_or_default()
}

pub fn classify_node(node: &Node) -> NodeClass {
    let status = node.status.as_ref();
    let conditions = status
        .and_then(|s| s.conditions.as_deref())
        .unwrap_or_default();
    let addresses = status
        .and_then(|s| s.addresses.as_deref())
        .unwrap_or_default();
    NodeClass {
        name: node.metadata.name.clone().unwrap_or_default(),
        role: node_role(node.metadata.labels.as_ref()),
        ready: is_ready(conditions),
        internal_ip: internal_ip(addresses),
    }
}

/// `usage / capacity * 100`, or None when capacity is not a positive finite number.
pub fn usage_percent(usage: f64, capacity: f64) -> Option<f64> {
    if !usage.is_finite() || !capacity.is_finite() || capacity <= 0.0 {
        return None;
    }
    Some(usage / capacity * 100.0)
}

/// Arithmetic mean of the known values. Unknown entries are excluded
/// from both sum and count; returns 0.0 when nothing is known.
pub fn average_percent<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

pub fn ready_ratio(ready: usize, total: usize) -> String {
    format!("{}/{}", ready, total)
}

/// Per-node input to the orchestrator summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeReading {
    pub role: NodeRole,
    pub ready: bool,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PodCounts {
    pub total: usize,
    pub running: usize,
    pub failed: usize,
}

impl PodCounts {
    /// Tally pod phases ("Running", "Failed", ...). Pods without a phase count toward total only.
    pub fn from_phases<'a, I>(phases: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        phases
            .into_iter()
            .fold(PodCounts::default(), |mut acc, phase| {
                acc.total += 1;
                match phase {
                    Some("Running") => acc.running += 1,
                    Some("Failed") => acc.failed += 1,
                    _ => {}
                }
                acc
            })
    }
}

/// Build the orchestrator summary. Healthy iff every control-plane and
/// worker node is ready and no pod has failed.
pub fn summarize_orchestrator(
    version: String,
    nodes: &[NodeReading],
    pods: PodCounts,
) -> OrchestratorStatus {
    let tally = |role: NodeRole| {
        let total = nodes.iter().filter(|n| n.role == role).count();
        let ready = nodes.iter().filter(|n| n.role == role && n.ready).count();
        (ready, total)
    };
    let (cp_ready, cp_total) = tally(NodeRole::ControlPlane);
    let (worker_ready, worker_total) = tally(NodeRole::Worker);

    OrchestratorStatus {
        version,
        control_plane_ready: ready_ratio(cp_ready, cp_total),
        worker_nodes_ready: ready_ratio(worker_ready, worker_total),
        total_pods: pods.total,
        running_pods: pods.running,
        failed_pods: pods.failed,
        cpu_usage_percent: average_percent(nodes.iter().map(|n| n.cpu_percent)),
        memory_usage_percent: average_percent(nodes.iter().map(|n| n.memory_percent)),
        healthy: cp_ready == cp_total && worker_ready == worker_total && pods.failed == 0,
    }
}

/// Humanized elapsed time: "42s ago", "5m ago", "3h ago", "2d ago".
pub fn format_age(elapsed: chrono::TimeDelta) -> String {
    let secs = elapsed.num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{}s ago", s),
        s if s < 3600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3600),
        s => format!("{}d ago", s / 86_400),
    }
}
