// Metrics collector: fans out to the cluster and node OS providers, merges
// their answers into one Snapshot, and serves it from a TTL cache.

mod outcome;

pub use outcome::Outcome;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::error::{CollectError, ProviderError, Source};
use crate::models::{
    GitOpsStatus, HardwareSpec, HardwareStatus, NodeDetail, NodeOsStatus, Snapshot,
};
use crate::provider::{ClusterStatusProvider, NodeOsStatusProvider};

/// Longest TTL honoured; larger values are clamped.
const MAX_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Zero disables caching.
    pub cache_ttl: Duration,
    /// Bound on each individual provider call.
    pub upstream_timeout: Duration,
    pub hardware: HardwareSpec,
}

struct CacheEntry {
    snapshot: Arc<Snapshot>,
    expires_at: Instant,
}

pub struct MetricsCollector {
    cluster: Arc<dyn ClusterStatusProvider>,
    node_os: Arc<dyn NodeOsStatusProvider>,
    config: CollectorConfig,
    /// Held for the whole pass: at most one pass in flight, concurrent misses wait for it.
    cache: Mutex<Option<CacheEntry>>,
}

impl MetricsCollector {
    pub fn new(
        cluster: Arc<dyn ClusterStatusProvider>,
        node_os: Arc<dyn NodeOsStatusProvider>,
        mut config: CollectorConfig,
    ) -> Self {
        config.cache_ttl = config.cache_ttl.min(MAX_CACHE_TTL);
        Self {
            cluster,
            node_os,
            config,
            cache: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Most recent successful snapshot, fresh or expired.
    pub async fn last_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.cache.lock().await.as_ref().map(|e| e.snapshot.clone())
    }

    /// Returns the cached snapshot while it is fresh, otherwise runs one
    /// aggregation pass and caches the result. A fatal upstream failure is
    /// returned as-is and leaves the previous cache entry in place.
    #[instrument(skip(self), fields(operation = "collect"))]
    pub async fn collect(&self) -> Result<Arc<Snapshot>, CollectError> {
        let mut cache = self.cache.lock().await;
        if let Some(entry) = cache.as_ref()
            && Instant::now() < entry.expires_at
        {
            debug!(updated_at = %entry.snapshot.updated_at, "snapshot cache hit");
            return Ok(entry.snapshot.clone());
        }

        let snapshot = Arc::new(self.aggregate().await?);
        *cache = Some(CacheEntry {
            snapshot: snapshot.clone(),
            expires_at: Instant::now() + self.config.cache_ttl,
        });
        Ok(snapshot)
    }

    async fn aggregate(&self) -> Result<Snapshot, CollectError> {
        let started = Instant::now();
        let limit = self.config.upstream_timeout;
        let cluster = self.cluster.as_ref();
        let node_os = self.node_os.as_ref();

        // Temperatures depend on node IPs, so they run after the inventory inside its branch.
        let inventory = async {
            match fetch(Source::Inventory, limit, cluster.get_node_details()).await {
                Ok(nodes) => Outcome::Ok(self.with_temperatures(nodes).await),
                Err(e) => Outcome::Fatal(e),
            }
        };

        let (nodes, orchestrator, applications, gitops, os_status) = tokio::join!(
            inventory,
            async {
                Outcome::required(
                    fetch(Source::Orchestrator, limit, cluster.get_orchestrator_status()).await,
                )
            },
            async {
                Outcome::required(
                    fetch(Source::Applications, limit, cluster.get_application_statuses()).await,
                )
            },
            async {
                Outcome::optional(
                    fetch(Source::GitOps, limit, cluster.get_gitops_status()).await,
                    GitOpsStatus::not_installed,
                )
            },
            async {
                Outcome::optional(
                    fetch(Source::NodeOs, limit, node_os.get_node_os_status()).await,
                    NodeOsStatus::unknown,
                )
            },
        );

        let degraded: Vec<&str> = [
            (Source::GitOps, gitops.is_degraded()),
            (Source::NodeOs, os_status.is_degraded()),
        ]
        .into_iter()
        .filter(|(_, d)| *d)
        .map(|(s, _)| s.as_str())
        .collect();

        let nodes = nodes.into_result()?;
        let orchestrator = orchestrator.into_result()?;
        let applications = applications.into_result()?;

        let snapshot = Snapshot {
            hardware: HardwareStatus::from_nodes(nodes, &self.config.hardware),
            node_os: os_status.into_result()?,
            orchestrator,
            gitops: gitops.into_result()?,
            applications,
            updated_at: Utc::now(),
        };

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            nodes = snapshot.hardware.node_count,
            degraded = ?degraded,
            "aggregation pass complete"
        );
        Ok(snapshot)
    }

    /// Fill in temperatures for nodes with a known IP. Per-node failures leave the reading untouched.
    async fn with_temperatures(&self, mut nodes: Vec<NodeDetail>) -> Vec<NodeDetail> {
        let limit = self.config.upstream_timeout;
        let node_os = self.node_os.as_ref();
        let readings = join_all(nodes.iter().map(|node| async move {
            if node.ip.is_empty() {
                return None;
            }
            match fetch(Source::Temperature, limit, node_os.get_node_temperature(&node.ip)).await {
                Ok(reading) => reading,
                Err(e) => {
                    debug!(node = %node.name, error = %e, "temperature unavailable");
                    None
                }
            }
        }))
        .await;

        for (node, reading) in nodes.iter_mut().zip(readings) {
            if let Some(celsius) = reading {
                node.temperature = celsius;
            }
        }
        nodes
    }
}

/// Run one provider call under `limit`, tagging failures with their upstream.
async fn fetch<T, F>(upstream: Source, limit: Duration, call: F) -> Result<T, CollectError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(error)) => Err(CollectError::Source { upstream, error }),
        Err(_) => Err(CollectError::Timeout {
            upstream,
            after: limit,
        }),
    }
}
