use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState, TracingSpeaker};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use jeevan_triage::config::AppConfig;
use jeevan_triage::error::AppError;
use jeevan_triage::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (service, _referrals) = build_service(&config.triage, Arc::new(TracingSpeaker));

    let app = with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        language = %config.triage.voice_language,
        high = config.triage.thresholds.high,
        medium = config.triage.thresholds.medium,
        "symptom triage service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
