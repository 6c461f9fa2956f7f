use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryAttemptRepository};
use crate::routes::with_attempt_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use psyroom::attempts::AttemptService;
use psyroom::config::AppConfig;
use psyroom::error::AppError;
use psyroom::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.catalog.take() {
        config.catalog.path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(load_catalog(config.catalog.path.as_deref())?);
    let repository = Arc::new(InMemoryAttemptRepository::default());
    let attempt_service = Arc::new(AttemptService::new(catalog, repository));

    let app = with_attempt_routes(attempt_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "psyroom scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
