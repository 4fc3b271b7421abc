// Monitored workloads (Deployments, DaemonSets, StatefulSets) -> ApplicationStatus

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::warn;

use crate::error::ProviderError;
use crate::models::ApplicationStatus;

/// Merge per-kind list results. A failed kind (e.g. RBAC denies its list)
/// is logged and skipped; the call fails only when every kind failed.
pub(crate) fn merge_kinds(
    kinds: Vec<(&'static str, Result<Vec<ApplicationStatus>, ProviderError>)>,
) -> Result<Vec<ApplicationStatus>, ProviderError> {
    let mut apps = Vec::new();
    let mut last_error = None;
    let mut any_listed = false;
    for (kind, result) in kinds {
        match result {
            Ok(items) => {
                any_listed = true;
                apps.extend(items);
            }
            Err(e) => {
                warn!(kind, error = %e, "listing workloads failed; skipping kind");
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) if !any_listed => Err(e),
        _ => Ok(apps),
    }
}

fn name_and_namespace(meta: &ObjectMeta) -> (String, String) {
    (
        meta.name.clone().unwrap_or_default(),
        meta.namespace.clone().unwrap_or_default(),
    )
}

/// Desired = spec.replicas (Kubernetes defaults it to 1).
pub(crate) fn from_deployment(d: &Deployment) -> ApplicationStatus {
    let (name, namespace) = name_and_namespace(&d.metadata);
    let desired = d.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    let ready = d.status.as_ref().and_then(|s| s.ready_replicas).unwrap_or(0);
    ApplicationStatus::new(name, namespace, ready, desired)
}

pub(crate) fn from_daemon_set(ds: &DaemonSet) -> ApplicationStatus {
    let (name, namespace) = name_and_namespace(&ds.metadata);
    let (ready, desired) = ds
        .status
        .as_ref()
        .map(|s| (s.number_ready, s.desired_number_scheduled))
        .unwrap_or((0, 0));
    ApplicationStatus::new(name, namespace, ready, desired)
}

pub(crate) fn from_stateful_set(ss: &StatefulSet) -> ApplicationStatus {
    let (name, namespace) = name_and_namespace(&ss.metadata);
    let desired = ss.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    let ready = ss.status.as_ref().and_then(|s| s.ready_replicas).unwrap_or(0);
    ApplicationStatus::new(name, namespace, ready, desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppState;
    use serde_json::json;

    fn app(name: &str) -> ApplicationStatus {
        ApplicationStatus::new(name.into(), "default".into(), 1, 1)
    }

    fn denied(kind: &'static str) -> ProviderError {
        ProviderError::Command {
            command: format!("list {}", kind),
            message: "forbidden".into(),
        }
    }

    #[test]
    fn denied_kind_is_skipped() {
        let apps = merge_kinds(vec![
            ("Deployment", Ok(vec![app("web"), app("api")])),
            ("DaemonSet", Ok(vec![app("node-exporter")])),
            ("StatefulSet", Err(denied("statefulsets"))),
        ])
        .unwrap();
        let names: Vec<&str> = apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["web", "api", "node-exporter"]);
    }

    #[test]
    fn empty_listing_is_not_a_failure() {
        let apps = merge_kinds(vec![
            ("Deployment", Ok(vec![])),
            ("DaemonSet", Err(denied("daemonsets"))),
            ("StatefulSet", Err(denied("statefulsets"))),
        ])
        .unwrap();
        assert!(apps.is_empty());
    }

    #[test]
    fn all_kinds_failing_fails_the_call() {
        let err = merge_kinds(vec![
            ("Deployment", Err(denied("deployments"))),
            ("DaemonSet", Err(denied("daemonsets"))),
            ("StatefulSet", Err(denied("statefulsets"))),
        ])
        .unwrap_err();
        assert!(matches!(err, ProviderError::Command { .. }));
    }

    #[test]
    fn deployment_scaled_to_zero() {
        let d: Deployment = serde_json::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "grafana", "namespace": "monitoring" },
            "spec": {
                "replicas": 0,
                "selector": {},
                "template": {}
            },
            "status": {}
        }))
        .unwrap();
        let app = from_deployment(&d);
        assert_eq!(app.name, "grafana");
        assert_eq!(app.namespace, "monitoring");
        assert_eq!(app.status, AppState::ScaledToZero);
        assert!(!app.healthy);
    }

    #[test]
    fn daemon_set_partially_ready_is_degraded() {
        let ds: DaemonSet = serde_json::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "DaemonSet",
            "metadata": { "name": "node-exporter", "namespace": "monitoring" },
            "status": {
                "currentNumberScheduled": 4,
                "desiredNumberScheduled": 4,
                "numberMisscheduled": 0,
                "numberReady": 3
            }
        }))
        .unwrap();
        let app = from_daemon_set(&ds);
        assert_eq!(app.status, AppState::Degraded);
        assert_eq!(app.ready_replicas, 3);
        assert_eq!(app.desired_replicas, 4);
    }

    #[test]
    fn stateful_set_fully_ready_is_running() {
        let ss: StatefulSet = serde_json::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "StatefulSet",
            "metadata": { "name": "postgres", "namespace": "db" },
            "spec": { "replicas": 2, "selector": {}, "serviceName": "postgres", "template": {} },
            "status": { "replicas": 2, "readyReplicas": 2 }
        }))
        .unwrap();
        let app = from_stateful_set(&ss);
        assert_eq!(app.status, AppState::Running);
        assert!(app.healthy);
    }
}
