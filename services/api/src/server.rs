use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLendingStore};
use crate::routes::with_lending_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_approval::config::AppConfig;
use credit_approval::error::AppError;
use credit_approval::telemetry;
use credit_approval::workflows::ingestion::IngestionJobs;
use credit_approval::workflows::lending::{EligibilityConfig, LendingService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.customer_data.take() {
        config.ingestion.customer_data = Some(path);
    }
    if let Some(path) = args.loan_data.take() {
        config.ingestion.loan_data = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryLendingStore::default());
    let lending_service = Arc::new(LendingService::new(
        store.clone(),
        store.clone(),
        EligibilityConfig::standard(),
    ));

    let app = with_lending_routes(lending_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    if config.ingestion.is_empty() {
        readiness_flag.store(true, Ordering::Release);
    } else {
        let ingestion = IngestionJobs::new(store.clone(), store).spawn(config.ingestion.clone());
        let readiness = readiness_flag.clone();
        tokio::spawn(async move {
            match ingestion.await {
                Ok(summary) if summary.succeeded() => info!("startup ingestion complete"),
                Ok(summary) => warn!(failures = ?summary.failures, "startup ingestion incomplete"),
                Err(err) => warn!(error = %err, "startup ingestion task aborted"),
            }
            readiness.store(true, Ordering::Release);
        });
    }

    info!(?config.environment, %addr, "credit approval service listening");

    axum::serve(listener, app).await?;
    Ok(())
}
