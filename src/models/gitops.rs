// Flux GitOps status

use serde::{Deserialize, Serialize};

/// A Flux reconciliation unit (Kustomization or HelmRelease).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitOpsResource {
    pub name: String,
    pub namespace: String,
    pub ready: bool,
    pub status: String,
    pub revision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitOpsStatus {
    pub version: String,
    pub git_repository: String,
    pub last_sync: String,
    pub kustomizations: Vec<GitOpsResource>,
    pub helm_releases: Vec<GitOpsResource>,
    pub healthy: bool,
}

impl GitOpsStatus {
    /// Placeholder used when Flux is absent or unreachable.
    pub fn not_installed() -> Self {
        Self {
            version: "Not Installed".into(),
            git_repository: "N/A".into(),
            last_sync: "N/A".into(),
            kustomizations: vec![],
            helm_releases: vec![],
            healthy: false,
        }
    }
}
