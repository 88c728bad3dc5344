use crate::cli::ServeArgs;
use crate::infra::{build_optimizer, cors_layer, AppState};
use crate::routes::with_schedule_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use shift_optimizer::config::AppConfig;
use shift_optimizer::error::AppError;
use shift_optimizer::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let optimizer = Arc::new(build_optimizer(&config.solver));
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        solver_backend: optimizer.backend_name(),
    };

    let backend = optimizer.backend_name();
    let deadline_secs = optimizer.deadline().map(|deadline| deadline.as_secs());

    let app = with_schedule_routes(optimizer)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.server))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        backend,
        ?deadline_secs,
        "shift optimizer ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
