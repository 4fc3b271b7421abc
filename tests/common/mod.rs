// Shared test helpers: stub providers with call counters and switchable failures

#![allow(dead_code)]

use async_trait::async_trait;
use cluster_dashboard::collector::{CollectorConfig, MetricsCollector};
use cluster_dashboard::error::ProviderError;
use cluster_dashboard::models::*;
use cluster_dashboard::provider::{ClusterStatusProvider, NodeOsStatusProvider};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ok,
    Fail,
    /// Never completes; exercises timeouts.
    Hang,
}

/// One stubbed provider method.
pub struct StubCall {
    mode: Mutex<Mode>,
    calls: AtomicUsize,
}

impl Default for StubCall {
    fn default() -> Self {
        Self {
            mode: Mutex::new(Mode::Ok),
            calls: AtomicUsize::new(0),
        }
    }
}

impl StubCall {
    pub fn set(&self, mode: Mode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mode = *self.mode.lock().unwrap();
        match mode {
            Mode::Ok => Ok(()),
            Mode::Fail => Err(ProviderError::Unavailable("stub")),
            Mode::Hang => std::future::pending().await,
        }
    }
}

pub fn node(name: &str, ip: &str, role: NodeRole, ready: bool) -> NodeDetail {
    NodeDetail {
        name: name.into(),
        ip: ip.into(),
        role,
        status: if ready { "Ready" } else { "NotReady" }.into(),
        cpu_usage: 10.0,
        memory_usage: 20.0,
        temperature: 0.0,
        is_ready: ready,
    }
}

pub fn default_nodes() -> Vec<NodeDetail> {
    vec![
        node("cp-1", "10.0.0.1", NodeRole::ControlPlane, true),
        node("w-1", "10.0.0.2", NodeRole::Worker, true),
    ]
}

pub struct StubCluster {
    pub nodes: Mutex<Vec<NodeDetail>>,
    pub inventory: StubCall,
    pub orchestrator: StubCall,
    pub applications: StubCall,
    pub gitops: StubCall,
}

impl StubCluster {
    pub fn new(nodes: Vec<NodeDetail>) -> Self {
        Self {
            nodes: Mutex::new(nodes),
            inventory: StubCall::default(),
            orchestrator: StubCall::default(),
            applications: StubCall::default(),
            gitops: StubCall::default(),
        }
    }
}

#[async_trait]
impl ClusterStatusProvider for StubCluster {
    async fn get_node_details(&self) -> Result<Vec<NodeDetail>, ProviderError> {
        self.inventory.enter().await?;
        Ok(self.nodes.lock().unwrap().clone())
    }

    async fn get_orchestrator_status(&self) -> Result<OrchestratorStatus, ProviderError> {
        self.orchestrator.enter().await?;
        Ok(OrchestratorStatus {
            version: "v1.31.2".into(),
            control_plane_ready: "1/1".into(),
            worker_nodes_ready: "1/1".into(),
            total_pods: 12,
            running_pods: 12,
            failed_pods: 0,
            cpu_usage_percent: 10.0,
            memory_usage_percent: 20.0,
            healthy: true,
        })
    }

    async fn get_application_statuses(&self) -> Result<Vec<ApplicationStatus>, ProviderError> {
        self.applications.enter().await?;
        Ok(vec![ApplicationStatus::new(
            "grafana".into(),
            "monitoring".into(),
            1,
            1,
        )])
    }

    async fn get_gitops_status(&self) -> Result<GitOpsStatus, ProviderError> {
        self.gitops.enter().await?;
        Ok(GitOpsStatus {
            version: "v2.4.0".into(),
            git_repository: "ssh://git@github.com/example/cluster".into(),
            last_sync: "1m ago".into(),
            kustomizations: vec![GitOpsResource {
                name: "apps".into(),
                namespace: "flux-system".into(),
                ready: true,
                status: "Ready".into(),
                revision: "main@sha1:abc123".into(),
                chart_version: None,
                age: None,
            }],
            helm_releases: vec![],
            healthy: true,
        })
    }
}

pub struct StubNodeOs {
    pub status: StubCall,
    pub temperature: StubCall,
    /// Node IP -> Celsius; IPs not listed report no measurement.
    pub temperatures: HashMap<String, f64>,
}

impl StubNodeOs {
    pub fn new() -> Self {
        Self {
            status: StubCall::default(),
            temperature: StubCall::default(),
            temperatures: HashMap::from([
                ("10.0.0.1".to_string(), 48.5),
                ("10.0.0.2".to_string(), 51.0),
            ]),
        }
    }
}

#[async_trait]
impl NodeOsStatusProvider for StubNodeOs {
    async fn get_node_os_status(&self) -> Result<NodeOsStatus, ProviderError> {
        self.status.enter().await?;
        Ok(NodeOsStatus {
            version: "v1.8.3".into(),
            cluster_health: "Healthy".into(),
            services: BTreeMap::from([
                ("apid".to_string(), "Running".to_string()),
                ("etcd".to_string(), "Running".to_string()),
                ("kubelet".to_string(), "Running".to_string()),
            ]),
            healthy: true,
        })
    }

    async fn get_version(&self) -> Result<String, ProviderError> {
        self.status.enter().await?;
        Ok("v1.8.3".into())
    }

    async fn get_node_temperature(&self, node_ip: &str) -> Result<Option<f64>, ProviderError> {
        self.temperature.enter().await?;
        Ok(self.temperatures.get(node_ip).copied())
    }
}

pub fn collector_config(ttl: Duration) -> CollectorConfig {
    CollectorConfig {
        cache_ttl: ttl,
        upstream_timeout: Duration::from_secs(5),
        hardware: HardwareSpec::default(),
    }
}

pub fn collector(
    cluster: Arc<StubCluster>,
    node_os: Arc<StubNodeOs>,
    ttl: Duration,
) -> MetricsCollector {
    MetricsCollector::new(cluster, node_os, collector_config(ttl))
}
