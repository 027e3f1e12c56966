use crate::cli::ServeArgs;
use crate::infra::{
    seed_registry, AppState, InMemoryDonorRepository, InMemoryMatchRepository, RegistryService,
};
use crate::routes::with_registry_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use medibytes::config::AppConfig;
use medibytes::error::AppError;
use medibytes::registry::DonorCsvImporter;
use medibytes::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let registry = Arc::new(RegistryService::new(
        Arc::new(InMemoryDonorRepository::default()),
        Arc::new(InMemoryMatchRepository::default()),
        config.matching.clone(),
    ));

    if let Some(path) = args.donors_csv.take() {
        let registrations = DonorCsvImporter::from_path(&path)?;
        let summary = seed_registry(&registry, registrations);
        info!(
            path = %path.display(),
            registered = summary.registered,
            skipped = summary.skipped,
            "seeded donor registry"
        );
    }

    let app = with_registry_routes(registry)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "organ donor registry ready");

    axum::serve(listener, app).await?;
    Ok(())
}
