// Monitored workload status

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppState {
    Running,
    Degraded,
    #[serde(rename = "Scaled to Zero")]
    ScaledToZero,
}

impl AppState {
    /// Classify a workload from its ready and desired replica counts.
    /// Returns the status label and whether the workload counts as healthy.
    pub fn classify(ready: i32, desired: i32) -> (Self, bool) {
        let healthy = ready == desired && desired > 0;
        let state = if desired == 0 {
            AppState::ScaledToZero
        } else if healthy {
            AppState::Running
        } else {
            AppState::Degraded
        };
        (state, healthy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationStatus {
    pub name: String,
    pub namespace: String,
    pub status: AppState,
    pub ready_replicas: i32,
    pub desired_replicas: i32,
    pub healthy: bool,
}

impl ApplicationStatus {
    pub fn new(name: String, namespace: String, ready: i32, desired: i32) -> Self {
        let (status, healthy) = AppState::classify(ready, desired);
        Self {
            name,
            namespace,
            status,
            ready_replicas: ready,
            desired_replicas: desired,
            healthy,
        }
    }
}
