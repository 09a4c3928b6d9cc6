use crate::cli::ServeArgs;
use crate::infra::{AppState, TracingObserver};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use data_alchemist::config::AppConfig;
use data_alchemist::error::AppError;
use data_alchemist::telemetry;
use data_alchemist::workspace::Workspace;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let mut workspace = Workspace::new(config.scoring.clone());
    workspace.subscribe(Box::new(TracingObserver));

    let app_state = AppState {
        workspace: Arc::new(Mutex::new(workspace)),
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "data alchemist configurator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
