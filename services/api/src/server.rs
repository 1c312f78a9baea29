use crate::background::run_daily_cleaning;
use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_front_desk_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hotel_desk::config::AppConfig;
use hotel_desk::error::AppError;
use hotel_desk::front_desk::{FrontDeskService, InMemoryHotelRepository, RefreshPolicy};
use hotel_desk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryHotelRepository::default());
    let front_desk = Arc::new(FrontDeskService::with_policy(
        repository,
        RefreshPolicy::from(&config.room_status),
    ));

    let cancel = CancellationToken::new();
    let scheduler = tokio::spawn(run_daily_cleaning(
        front_desk.clone(),
        config.housekeeping.assignment_hour,
        cancel.clone(),
    ));

    let app = with_front_desk_routes(front_desk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        refresh_on_maintenance = config.room_status.refresh_on_maintenance,
        "hotel front desk ready"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    readiness_flag.store(false, Ordering::Release);
    cancel.cancel();
    if tokio::time::timeout(Duration::from_secs(5), scheduler)
        .await
        .is_err()
    {
        warn!("daily cleaning scheduler did not stop in time");
    }
    info!("hotel front desk stopped");

    served?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "unable to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
