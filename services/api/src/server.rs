use crate::cli::ServeArgs;
use crate::infra::{seed_directory, spawn_delivery, AppState, NotificationInbox, Placement};
use crate::routes::with_placement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use placement_portal::config::AppConfig;
use placement_portal::error::AppError;
use placement_portal::telemetry;
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
    let inbox = NotificationInbox::default();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        inbox: inbox.clone(),
    };

    let (notifications, _delivery) = spawn_delivery(inbox);
    let placement = Placement::in_memory(
        Arc::new(seed_directory()),
        Arc::new(notifications),
        config.placement,
    );

    let app = with_placement_routes(&placement)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_max_students = config.placement.default_max_students,
        commit_retries = config.placement.commit_retries,
        "placement portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
