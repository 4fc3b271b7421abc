// Kubernetes cluster status via kube-rs (nodes, metrics-server, workloads, Flux CRDs)

mod flux;
mod nodes;
mod quantity;
mod workloads;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::Client;
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind, ListParams};
use tracing::{debug, instrument, warn};

use crate::classify::{PodCounts, summarize_orchestrator};
use crate::config::KubernetesConfig;
use crate::error::ProviderError;
use crate::models::{
    ApplicationStatus, GitOpsResource, GitOpsStatus, NodeDetail, OrchestratorStatus,
};
use crate::provider::ClusterStatusProvider;
use flux::{FLUX_PART_OF, FluxKind};
use nodes::{NodeSample, usage_by_node};

pub struct KubeRepo {
    client: Client,
    monitor_label: String,
    flux_namespace: String,
}

impl KubeRepo {
    /// In-cluster service account first, then local kubeconfig.
    pub async fn connect(config: &KubernetesConfig) -> anyhow::Result<Self> {
        let mut client_config = kube::Config::infer().await?;
        client_config.read_timeout = Some(Duration::from_secs(config.request_timeout_secs));
        let client = Client::try_from(client_config)?;
        Ok(Self::new(client, config))
    }

    pub fn new(client: Client, config: &KubernetesConfig) -> Self {
        Self {
            client,
            monitor_label: config.monitor_label.clone(),
            flux_namespace: config.flux_namespace.clone(),
        }
    }

    /// Nodes with usage percentages. Missing metrics-server only drops the usage figures.
    async fn sample_nodes(&self) -> Result<Vec<NodeSample>, ProviderError> {
        let nodes = Api::<Node>::all(self.client.clone())
            .list(&ListParams::default())
            .await?;

        let metrics_api = ApiResource::from_gvk_with_plural(
            &GroupVersionKind::gvk("metrics.k8s.io", "v1beta1", "NodeMetrics"),
            "nodes",
        );
        let usage = match Api::<DynamicObject>::all_with(self.client.clone(), &metrics_api)
            .list(&ListParams::default())
            .await
        {
            Ok(list) => usage_by_node(&list.items),
            Err(e) => {
                debug!(error = %e, "node metrics unavailable");
                Default::default()
            }
        };

        Ok(nodes
            .items
            .iter()
            .map(|node| {
                let name = node.metadata.name.as_deref().unwrap_or_default();
                NodeSample::from_node(node, usage.get(name))
            })
            .collect())
    }

    async fn flux_resources(&self, kind: FluxKind, now: DateTime<Utc>) -> Vec<GitOpsResource> {
        let api = Api::<DynamicObject>::all_with(self.client.clone(), &kind.api_resource());
        match api.list(&ListParams::default()).await {
            Ok(list) => list
                .items
                .iter()
                .map(|obj| flux::flux_resource(obj, kind, now))
                .collect(),
            Err(e) => {
                warn!(error = %e, kind = ?kind, "listing Flux resources failed");
                vec![]
            }
        }
    }

    /// (repository url, last sync) of the bootstrap GitRepository.
    async fn git_repository(&self, now: DateTime<Utc>) -> (Option<String>, Option<String>) {
        let api = Api::<DynamicObject>::namespaced_with(
            self.client.clone(),
            &self.flux_namespace,
            &FluxKind::GitRepository.api_resource(),
        );
        match api.get_opt(&self.flux_namespace).await {
            Ok(Some(repo)) => (flux::repository_url(&repo), flux::last_sync(&repo, now)),
            Ok(None) => (None, None),
            Err(e) => {
                warn!(error = %e, "reading GitRepository failed");
                (None, None)
            }
        }
    }
}

fn pod_phase(pod: &Pod) -> Option<&str> {
    pod.status.as_ref()?.phase.as_deref()
}

#[async_trait]
impl ClusterStatusProvider for KubeRepo {
    #[instrument(skip(self), fields(repo = "kube", operation = "get_node_details"))]
    async fn get_node_details(&self) -> Result<Vec<NodeDetail>, ProviderError> {
        Ok(self
            .sample_nodes()
            .await?
            .iter()
            .map(NodeSample::detail)
            .collect())
    }

    #[instrument(skip(self), fields(repo = "kube", operation = "get_orchestrator_status"))]
    async fn get_orchestrator_status(&self) -> Result<OrchestratorStatus, ProviderError> {
        let version = async {
            self.client
                .apiserver_version()
                .await
                .map_err(ProviderError::from)
        };
        let pods = async {
            Api::<Pod>::all(self.client.clone())
                .list(&ListParams::default())
                .await
                .map_err(ProviderError::from)
        };
        let (info, samples, pods) = tokio::try_join!(version, self.sample_nodes(), pods)?;

        let readings: Vec<_> = samples.iter().map(NodeSample::reading).collect();
        let counts = PodCounts::from_phases(pods.items.iter().map(pod_phase));
        Ok(summarize_orchestrator(info.git_version, &readings, counts))
    }

    #[instrument(skip(self), fields(repo = "kube", operation = "get_application_statuses"))]
    async fn get_application_statuses(&self) -> Result<Vec<ApplicationStatus>, ProviderError> {
        let params = ListParams::default().labels(&self.monitor_label);
        let deployment_api = Api::<Deployment>::all(self.client.clone());
        let daemon_set_api = Api::<DaemonSet>::all(self.client.clone());
        let stateful_set_api = Api::<StatefulSet>::all(self.client.clone());
        let (deployments, daemon_sets, stateful_sets) = tokio::join!(
            deployment_api.list(&params),
            daemon_set_api.list(&params),
            stateful_set_api.list(&params),
        );

        workloads::merge_kinds(vec![
            (
                "Deployment",
                deployments
                    .map(|l| l.items.iter().map(workloads::from_deployment).collect::<Vec<_>>())
                    .map_err(ProviderError::from),
            ),
            (
                "DaemonSet",
                daemon_sets
                    .map(|l| l.items.iter().map(workloads::from_daemon_set).collect::<Vec<_>>())
                    .map_err(ProviderError::from),
            ),
            (
                "StatefulSet",
                stateful_sets
                    .map(|l| l.items.iter().map(workloads::from_stateful_set).collect::<Vec<_>>())
                    .map_err(ProviderError::from),
            ),
        ])
    }

    #[instrument(skip(self), fields(repo = "kube", operation = "get_gitops_status"))]
    async fn get_gitops_status(&self) -> Result<GitOpsStatus, ProviderError> {
        let controllers = Api::<Pod>::namespaced(self.client.clone(), &self.flux_namespace)
            .list(&ListParams::default().labels(FLUX_PART_OF))
            .await?;
        if controllers.items.is_empty() {
            return Err(ProviderError::NotInstalled("flux"));
        }
        let controllers_healthy = controllers
            .items
            .iter()
            .all(|p| pod_phase(p) == Some("Running"));

        let now = Utc::now();
        let ((repository, last_sync), kustomizations, helm_releases) = tokio::join!(
            self.git_repository(now),
            self.flux_resources(FluxKind::Kustomization, now),
            self.flux_resources(FluxKind::HelmRelease, now),
        );
        let healthy = controllers_healthy
            && kustomizations
                .iter()
                .chain(helm_releases.iter())
                .all(|r| r.ready);

        Ok(GitOpsStatus {
            version: flux::controller_version(&controllers.items)
                .unwrap_or_else(|| "Unknown".into()),
            git_repository: repository.unwrap_or_else(|| "N/A".into()),
            last_sync: last_sync.unwrap_or_else(|| "N/A".into()),
            kustomizations,
            helm_releases,
            healthy,
        })
    }
}
