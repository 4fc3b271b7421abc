// talosctl output parsing

use std::collections::BTreeMap;

const HEALTHY_STATES: [&str; 2] = ["Running", "Finished"];

/// Server version from `talosctl version`. Both output forms are accepted:
///
/// ```text
/// Client:                          Client:
///     Tag:         v1.8.3              Talos v1.8.3
/// Server:                          Server:
///     NODE:        10.0.0.2            NODE:        10.0.0.2
///     Tag:         v1.8.3              Talos v1.8.3
/// ```
pub(crate) fn parse_server_tag(out: &str) -> Option<String> {
    out.lines()
        .map(str::trim)
        .skip_while(|l| *l != "Server:")
        .filter_map(|l| l.strip_prefix("Tag:").or_else(|| l.strip_prefix("Talos ")))
        .map(|tag| tag.trim().to_string())
        .find(|tag| !tag.is_empty())
}

/// Service name -> state from the `talosctl services` table. When several
/// nodes report the same service, a non-healthy state wins.
pub(crate) fn parse_services(out: &str) -> BTreeMap<String, String> {
    let mut lines = out.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return BTreeMap::new();
    };
    let columns: Vec<&str> = header.split_whitespace().collect();
    let (Some(service_col), Some(state_col)) = (
        columns.iter().position(|c| *c == "SERVICE"),
        columns.iter().position(|c| *c == "STATE"),
    ) else {
        return BTreeMap::new();
    };

    let mut services: BTreeMap<String, String> = BTreeMap::new();
    for line in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (Some(name), Some(state)) = (fields.get(service_col), fields.get(state_col)) else {
            continue;
        };
        let keep_existing = services
            .get(*name)
            .is_some_and(|prev| !HEALTHY_STATES.contains(&prev.as_str()));
        if !keep_existing {
            services.insert(name.to_string(), state.to_string());
        }
    }
    services
}

/// True when at least one service is known and all are Running or Finished.
pub(crate) fn services_healthy(services: &BTreeMap<String, String>) -> bool {
    !services.is_empty()
        && services
            .values()
            .all(|s| HEALTHY_STATES.contains(&s.as_str()))
}

/// Thermal zone reading (millidegrees) -> Celsius.
pub(crate) fn parse_millicelsius(out: &str) -> Option<f64> {
    let millidegrees: f64 = out.trim().parse().ok()?;
    Some(millidegrees / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_tag_ignores_client_section() {
        let out = "\
Client:
\tTag:         v1.9.0
\tSHA:         abc1234
\tOS/Arch:     linux/amd64
Server:
\tNODE:        10.0.0.2
\tTag:         v1.8.3
\tSHA:         def5678
\tEnabled:     RBAC
";
        assert_eq!(parse_server_tag(out).as_deref(), Some("v1.8.3"));
        assert_eq!(parse_server_tag("Client:\n\tTag: v1.9.0\n"), None);
    }

    #[test]
    fn server_tag_from_short_form() {
        let out = "Client:\n\tTalos v1.9.0\nServer:\n\tNODE:        10.0.0.2\n\tTalos v1.8.3\n";
        assert_eq!(parse_server_tag(out).as_deref(), Some("v1.8.3"));
        assert_eq!(parse_server_tag("Client:\n\tTalos v1.9.0\n"), None);
    }

    #[test]
    fn services_table_is_parsed_by_header() {
        let out = "\
NODE       SERVICE   STATE     HEALTH   LAST CHANGE   LAST EVENT
10.0.0.2   apid      Running   OK       2h ago        Health check successful
10.0.0.2   etcd      Running   OK       2h ago        Health check successful
10.0.0.2   kubelet   Running   OK       2h ago        Health check successful
";
        let services = parse_services(out);
        assert_eq!(services.len(), 3);
        assert_eq!(services.get("etcd").map(String::as_str), Some("Running"));
        assert!(services_healthy(&services));
    }

    #[test]
    fn failing_service_on_any_node_wins() {
        let out = "\
NODE       SERVICE   STATE      HEALTH   LAST CHANGE   LAST EVENT
10.0.0.2   kubelet   Running    OK       2h ago        ok
10.0.0.3   kubelet   Preparing  ?        1m ago        waiting
10.0.0.4   kubelet   Running    OK       2h ago        ok
";
        let services = parse_services(out);
        assert_eq!(services.get("kubelet").map(String::as_str), Some("Preparing"));
        assert!(!services_healthy(&services));
    }

    #[test]
    fn empty_output_has_no_services() {
        assert!(parse_services("").is_empty());
        assert!(!services_healthy(&BTreeMap::new()));
    }

    #[test]
    fn millicelsius_converts_to_celsius() {
        assert_eq!(parse_millicelsius("52000\n"), Some(52.0));
        assert_eq!(parse_millicelsius("n/a"), None);
    }
}
