use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryInterviewStore, InMemoryNotificationPublisher, StaticOfficeDirectory,
};
use crate::routes::with_interview_routes;
use interview_flow::config::AppConfig;
use interview_flow::error::AppError;
use interview_flow::telemetry;
use interview_flow::workflows::interviews::InterviewLifecycleService;

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

    let store = Arc::new(InMemoryInterviewStore::default());
    let offices = Arc::new(StaticOfficeDirectory::default());
    let notifier = Arc::new(InMemoryNotificationPublisher::default());
    let lifecycle_service = Arc::new(InterviewLifecycleService::new(store, offices, notifier));

    let app = with_interview_routes(lifecycle_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "interview lifecycle service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
