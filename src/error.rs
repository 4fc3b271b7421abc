// Provider and collection errors

use std::time::Duration;

/// Upstream data source consulted during an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Inventory,
    Temperature,
    Orchestrator,
    Applications,
    GitOps,
    NodeOs,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Inventory => "inventory",
            Source::Temperature => "temperature",
            Source::Orchestrator => "orchestrator",
            Source::Applications => "applications",
            Source::GitOps => "gitops",
            Source::NodeOs => "node_os",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a cluster or node OS provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("kubernetes api: {0}")]
    Kube(#[from] kube::Error),
    #[error("{command}: {message}")]
    Command { command: String, message: String },
    #[error("parse {what}: {message}")]
    Parse { what: &'static str, message: String },
    #[error("{0} is not installed")]
    NotInstalled(&'static str),
    #[error("{0} provider unavailable")]
    Unavailable(&'static str),
}

/// Fatal-to-pass error returned by `MetricsCollector::collect`.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("failed to get {upstream}: {error}")]
    Source {
        upstream: Source,
        #[source]
        error: ProviderError,
    },
    #[error("{upstream} query timed out after {after:?}")]
    Timeout { upstream: Source, after: Duration },
}

impl CollectError {
    /// The upstream whose failure aborted the pass.
    pub fn upstream(&self) -> Source {
        match self {
            CollectError::Source { upstream, .. } | CollectError::Timeout { upstream, .. } => {
                *upstream
            }
        }
    }
}
