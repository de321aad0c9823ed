use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use sttk::config::AppConfig;
use sttk::error::AppError;
use sttk::penalty::PenaltyEngine;
use sttk::telemetry;
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

    let report_service = Arc::new(build_service(PenaltyEngine::new(config.penalty.clone())));
    let next_id = report_service.resume_numbering()?;

    let app = with_operational_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        next_report_id = %next_id,
        loss_policy = ?config.penalty.loss,
        variance_policy = ?config.penalty.variance,
        "sttk penalty ledger service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
