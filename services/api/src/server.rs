use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_origination_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_origination::config::AppConfig;
use loan_origination::error::AppError;
use loan_origination::telemetry;
use loan_origination::workflows::origination::LoanOriginationService;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(LoanOriginationService::from_config(&config.decision)?);
    let status = service.model_status();
    if !status.loaded {
        warn!(
            model_path = %config.decision.model_path.display(),
            "serving without a classifier; every application will be rejected"
        );
    }

    let app = with_origination_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        schema = %status.schema,
        model_loaded = status.loaded,
        "loan origination service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
