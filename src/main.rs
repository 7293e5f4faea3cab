//! Payment service entry point.
//!
//! Uses `anyhow` for startup errors; request-level errors go through
//! `PaymentError` and `PaymentApiError`.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codelab_payments::adapters::http::{payment_router, PaymentAppState};
use codelab_payments::adapters::{PostgresPaymentRepository, VnPayConfig, VnPayGateway};
use codelab_payments::application::{ExpirePendingPaymentsCommand, ExpirePendingPaymentsHandler};
use codelab_payments::config::AppConfig;
use codelab_payments::domain::foundation::Timestamp;
use codelab_payments::ports::PaymentRepository;

/// How often abandoned payments are swept.
const EXPIRE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_filter.clone().into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Database connection
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;

    tracing::info!(database = %config.database.redacted_url(), "Connected to database");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations completed");
    }

    let repository: Arc<dyn PaymentRepository> =
        Arc::new(PostgresPaymentRepository::new(pool.clone()));
    let gateway = Arc::new(VnPayGateway::new(VnPayConfig::from_settings(&config.payment)?));

    if config.payment.is_sandbox() {
        tracing::warn!("VNPay gateway is pointed at the sandbox");
    }

    spawn_expiry_sweeper(repository.clone(), config.payment.expiry_grace_minutes);

    let state = PaymentAppState {
        payment_repository: repository,
        gateway,
        expire_minutes: config.payment.expire_minutes,
    };

    // CORS configuration
    let allowed_origins: Vec<HeaderValue> = config
        .server
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([Method::GET, Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-user-id"),
        ]));

    let app = Router::new()
        .merge(payment_router())
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config.server.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Periodically moves overdue pending payments to `expired`.
fn spawn_expiry_sweeper(repository: Arc<dyn PaymentRepository>, grace_minutes: i64) {
    let handler = ExpirePendingPaymentsHandler::new(repository, grace_minutes);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EXPIRE_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let cmd = ExpirePendingPaymentsCommand {
                now: Timestamp::now(),
            };
            if let Err(e) = handler.handle(cmd).await {
                tracing::warn!(error = %e, "Payment expiry sweep failed, will retry");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
