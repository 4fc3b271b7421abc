// Stand-in node OS provider for when talosctl cannot be used

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::NodeOsStatus;
use crate::provider::NodeOsStatusProvider;

/// Reports the node OS layer as unavailable; the collector substitutes placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableNodeOs;

#[async_trait]
impl NodeOsStatusProvider for UnavailableNodeOs {
    async fn get_node_os_status(&self) -> Result<NodeOsStatus, ProviderError> {
        Err(ProviderError::Unavailable("talos"))
    }

    async fn get_version(&self) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable("talos"))
    }

    async fn get_node_temperature(&self, _node_ip: &str) -> Result<Option<f64>, ProviderError> {
        Ok(None)
    }
}
