// Node inventory sampling: classification plus usage percentages from metrics-server

use std::collections::HashMap;

use k8s_openapi::api::core::v1::Node;
use kube::api::DynamicObject;

use super::quantity::parse_quantity;
use crate::classify::{NodeClass, NodeReading, classify_node, usage_percent};
use crate::models::NodeDetail;

/// Raw usage reported by metrics.k8s.io for one node (cores, bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RawUsage {
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
}

/// Node name -> usage, from a NodeMetrics list.
pub(crate) fn usage_by_node(metrics: &[DynamicObject]) -> HashMap<String, RawUsage> {
    metrics
        .iter()
        .filter_map(|m| {
            let name = m.metadata.name.clone()?;
            let usage = m.data.get("usage")?;
            let read = |key: &str| usage.get(key).and_then(|v| v.as_str()).and_then(parse_quantity);
            Some((
                name,
                RawUsage {
                    cpu: read("cpu"),
                    memory: read("memory"),
                },
            ))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeSample {
    pub class: NodeClass,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
}

impl NodeSample {
    pub fn from_node(node: &Node, usage: Option<&RawUsage>) -> Self {
        let capacity = |key: &str| {
            node.status
                .as_ref()
                .and_then(|s| s.capacity.as_ref())
                .and_then(|c| c.get(key))
                .and_then(|q| parse_quantity(&q.0))
        };
        let percent = |used: Option<f64>, key: &str| match (used, capacity(key)) {
            (Some(used), Some(cap)) => usage_percent(used, cap),
            _ => None,
        };
        Self {
            class: classify_node(node),
            cpu_percent: percent(usage.and_then(|u| u.cpu), "cpu"),
            memory_percent: percent(usage.and_then(|u| u.memory), "memory"),
        }
    }

    pub fn detail(&self) -> NodeDetail {
        NodeDetail {
            name: self.class.name.clone(),
            ip: self.class.internal_ip.clone(),
            role: self.class.role,
            status: if self.class.ready { "Ready" } else { "NotReady" }.into(),
            cpu_usage: self.cpu_percent.unwrap_or(0.0),
            memory_usage: self.memory_percent.unwrap_or(0.0),
            temperature: 0.0,
            is_ready: self.class.ready,
        }
    }

    pub fn reading(&self) -> NodeReading {
        NodeReading {
            role: self.class.role,
            ready: self.class.ready,
            cpu_percent: self.cpu_percent,
            memory_percent: self.memory_percent,
        }
    }
}
