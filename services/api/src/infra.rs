use axum::http::{HeaderValue, Method};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use shift_optimizer::config::{ServerConfig, SolverConfig};
use shift_optimizer::scheduling::{MilpBackend, ShiftOptimizer};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) solver_backend: &'static str,
}

pub(crate) fn build_optimizer(config: &SolverConfig) -> ShiftOptimizer {
    ShiftOptimizer::new(Arc::new(MilpBackend::new())).with_deadline(config.timeout)
}

/// Browser access limited to the configured origins; unparseable entries are skipped.
/// A `*` entry opens the API to any origin, without credentials.
pub(crate) fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        warn!("CORS wildcard configured; credentials are not allowed");
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
