use anyhow::Result;
use cluster_dashboard::collector::MetricsCollector;
use cluster_dashboard::provider::NodeOsStatusProvider;
use cluster_dashboard::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Time allowed for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting cluster dashboard");
    let app_config = config::AppConfig::load()?;

    let kube_repo = Arc::new(
        kube_repo::KubeRepo::connect(&app_config.kubernetes)
            .await
            .map_err(|e| anyhow::anyhow!("kubernetes client: {}", e))?,
    );
    tracing::info!("Kubernetes client initialized");

    let node_os: Arc<dyn NodeOsStatusProvider> =
        match talos_repo::TalosRepo::connect(&app_config.talos) {
            Ok(repo) => {
                tracing::info!(config = %repo.config_path().display(), "Talos client initialized");
                Arc::new(repo)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Talos client unavailable; continuing with limited functionality"
                );
                Arc::new(talos_repo::UnavailableNodeOs)
            }
        };

    let collector_config = app_config.collector_config();
    tracing::info!(
        cache_ttl_secs = collector_config.cache_ttl.as_secs(),
        upstream_timeout_secs = collector_config.upstream_timeout.as_secs(),
        "Metrics collector initialized"
    );
    let collector = Arc::new(MetricsCollector::new(kube_repo, node_os, collector_config));
    let templates = Arc::new(routes::Templates::new()?);

    let app = routes::app(collector, templates, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Received shutdown signal");
        let _ = drain_tx.send(());
    });

    tokio::select! {
        result = server => {
            result?;
        }
        _ = async {
            let _ = drain_rx.await;
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        } => {
            tracing::warn!("Forced shutdown after {:?}", SHUTDOWN_GRACE);
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
