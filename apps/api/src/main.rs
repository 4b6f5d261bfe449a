use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use auth_cell::UserService;
use shared_config::AppConfig;
use shared_notifications::{
    DisabledTransport, EmailDispatcher, MailTransport, SendGridClient,
    dispatcher::DEFAULT_QUEUE_CAPACITY,
};
use shared_utils::AppState;

/// How long queued confirmation emails get to go out after shutdown starts.
const MAIL_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic portal API server");

    let config = AppConfig::from_env();
    if !config.is_configured() {
        warn!("Store credentials are incomplete; requests touching the store will fail");
    }
    let port = config.port;
    let request_timeout = Duration::from_secs(config.request_timeout_secs);

    let transport: Arc<dyn MailTransport> = if config.is_mail_configured() {
        Arc::new(SendGridClient::new(&config).context("failed to build SendGrid client")?)
    } else {
        Arc::new(DisabledTransport)
    };
    let (mailer, mail_handle) = EmailDispatcher::spawn(transport, DEFAULT_QUEUE_CAPACITY);

    let state = Arc::new(
        AppState::new(config, mailer).context("failed to build store client")?,
    );

    if !state.config.admin_emails.is_empty() {
        if let Err(e) = UserService::new(state.db.clone())
            .seed_admins(&state.config.admin_emails)
            .await
        {
            error!("Failed to seed admin accounts: {}", e);
        }
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The router takes the only long-lived reference to the state, so the
    // mail queue closes once the server stops.
    let app = router::create_router(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped, flushing email queue");
    if tokio::time::timeout(MAIL_DRAIN_TIMEOUT, mail_handle.drain()).await.is_err() {
        warn!("Email queue not drained within {:?}", MAIL_DRAIN_TIMEOUT);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
