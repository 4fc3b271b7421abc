// Dashboard snapshot models (JSON wire format, snake_case keys)

mod application;
mod gitops;
mod hardware;
mod node_os;
mod orchestrator;
mod snapshot;

pub use application::{AppState, ApplicationStatus};
pub use gitops::{GitOpsResource, GitOpsStatus};
pub use hardware::{HardwareSpec, HardwareStatus, NodeDetail, NodeRole};
pub use node_os::NodeOsStatus;
pub use orchestrator::OrchestratorStatus;
pub use snapshot::Snapshot;
