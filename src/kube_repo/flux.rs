// Flux custom resources (GitRepository, Kustomization, HelmRelease) read as dynamic objects

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind};
use serde_json::Value;

use crate::classify::format_age;
use crate::models::GitOpsResource;

/// Label carried by every Flux controller pod.
pub(crate) const FLUX_PART_OF: &str = "app.kubernetes.io/part-of=flux";
const VERSION_LABEL: &str = "app.kubernetes.io/version";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FluxKind {
    GitRepository,
    Kustomization,
    HelmRelease,
}

impl FluxKind {
    pub fn api_resource(&self) -> ApiResource {
        let (group, version, kind, plural) = match self {
            FluxKind::GitRepository => (
                "source.toolkit.fluxcd.io",
                "v1",
                "GitRepository",
                "gitrepositories",
            ),
            FluxKind::Kustomization => (
                "kustomize.toolkit.fluxcd.io",
                "v1",
                "Kustomization",
                "kustomizations",
            ),
            FluxKind::HelmRelease => ("helm.toolkit.fluxcd.io", "v2", "HelmRelease", "helmreleases"),
        };
        ApiResource::from_gvk_with_plural(&GroupVersionKind::gvk(group, version, kind), plural)
    }
}

fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |v, key| v.get(*key))
        .and_then(Value::as_str)
}

/// Status of the "Ready" condition; None when the resource reports no such condition.
fn ready_condition(data: &Value) -> Option<bool> {
    data.get("status")?
        .get("conditions")?
        .as_array()?
        .iter()
        .find(|c| c.get("type").and_then(Value::as_str) == Some("Ready"))
        .map(|c| c.get("status").and_then(Value::as_str) == Some("True"))
}

pub(crate) fn flux_resource(
    obj: &DynamicObject,
    kind: FluxKind,
    now: DateTime<Utc>,
) -> GitOpsResource {
    let ready = ready_condition(&obj.data);
    let status = match (kind, ready) {
        (FluxKind::HelmRelease, Some(true)) => "Deployed",
        (FluxKind::HelmRelease, Some(false)) => "Failed",
        (_, Some(true)) => "Ready",
        (_, Some(false)) => "NotReady",
        (_, None) => "Unknown",
    };
    let (revision, chart_version, age) = match kind {
        FluxKind::HelmRelease => (
            str_at(&obj.data, &["status", "lastAttemptedRevision"]),
            str_at(&obj.data, &["spec", "chart", "spec", "version"]).map(String::from),
            obj.metadata
                .creation_timestamp
                .as_ref()
                .map(|t| format_age(now - t.0)),
        ),
        _ => (
            str_at(&obj.data, &["status", "lastAppliedRevision"]),
            None,
            None,
        ),
    };
    GitOpsResource {
        name: obj.metadata.name.clone().unwrap_or_default(),
        namespace: obj.metadata.namespace.clone().unwrap_or_default(),
        ready: ready.unwrap_or(false),
        status: status.into(),
        revision: revision.unwrap_or_default().into(),
        chart_version,
        age,
    }
}

/// Tracked repository URL of a GitRepository.
pub(crate) fn repository_url(obj: &DynamicObject) -> Option<String> {
    str_at(&obj.data, &["spec", "url"]).map(String::from)
}

/// Humanized age of the GitRepository's last fetched artifact.
pub(crate) fn last_sync(obj: &DynamicObject, now: DateTime<Utc>) -> Option<String> {
    let raw = str_at(&obj.data, &["status", "artifact", "lastUpdateTime"])?;
    let at = DateTime::parse_from_rfc3339(raw).ok()?;
    Some(format_age(now - at.with_timezone(&Utc)))
}

/// Flux version as advertised by the controller pods' version label.
pub(crate) fn controller_version(pods: &[Pod]) -> Option<String> {
    pods.iter()
        .filter_map(|p| p.metadata.labels.as_ref()?.get(VERSION_LABEL).cloned())
        .next()
}
