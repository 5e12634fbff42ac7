use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use jeevan_triage::workflows::assessment::{
    assessment_router, AssessmentRepository, AssessmentService, ReferralPublisher,
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn with_assessment_routes<R, P>(service: Arc<AssessmentService<R, P>>) -> axum::Router
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Relaxed) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{build_service, TracingSpeaker};
    use axum::body::Body;
    use axum::http::Request;
    use jeevan_triage::config::TriageConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let (service, _) = build_service(&TriageConfig::default(), Arc::new(TracingSpeaker));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_assessment_routes(service).layer(Extension(state))
    }

    async fn status_of(router: axum::Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        assert_eq!(status_of(app(false), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        assert_eq!(
            status_of(app(false), "/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(app(true), "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_render_as_text() {
        assert_eq!(status_of(app(true), "/metrics").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn assessment_routes_are_mounted() {
        assert_eq!(
            status_of(app(true), "/api/v1/complaints/fever/questions").await,
            StatusCode::OK
        );
    }
}
