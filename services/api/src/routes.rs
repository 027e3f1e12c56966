use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use medibytes::registry::{registry_router, DonorMatchingService, DonorRepository, MatchRepository};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_registry_routes<R, M>(service: Arc<DonorMatchingService<R, M>>) -> axum::Router
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    registry_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
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
    use crate::infra::{InMemoryDonorRepository, InMemoryMatchRepository};
    use axum::body::Body;
    use axum::http::Request;
    use medibytes::registry::MatchingConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn app(state: AppState) -> axum::Router {
        let service = Arc::new(DonorMatchingService::new(
            Arc::new(InMemoryDonorRepository::default()),
            Arc::new(InMemoryMatchRepository::default()),
            MatchingConfig::default(),
        ));
        with_registry_routes(service).layer(Extension(state))
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flagged() {
        let state = app_state(false);
        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_registry_routes_share_one_router() {
        let router = app(app_state(true));

        let health = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(health.status(), StatusCode::OK);

        let search = router
            .oneshot(
                Request::get("/api/v1/organ-donors/search?organ_type=pancreas")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(search.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_search_organ_is_unprocessable() {
        let router = app(app_state(true));

        let response = router
            .oneshot(
                Request::get("/api/v1/organ-donors/search?organ_type=spleen")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_text_format() {
        let response = metrics_endpoint(Extension(app_state(true)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; version=0.0.4"
        );
    }
}
