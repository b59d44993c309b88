use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sv_api::config::ServerConfig;
use sv_api::router::build_app_router;
use sv_api::state::AppState;
use sv_db::DbPool;
use sv_mail::Mailer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        app_base_url = %config.app_base_url,
        mail_transport = config.mail.transport.as_str(),
        "Loaded server configuration"
    );

    let pool = prepare_database(&config).await;
    let mailer = Mailer::from_config(&config.mail)
        .unwrap_or_else(|e| panic!("Mail transport unusable: {e}"));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .unwrap_or_else(|e| panic!("HOST/PORT do not form a socket address: {e}"));
    let app = build_app_router(
        AppState {
            pool: pool.clone(),
            config: Arc::new(config.clone()),
            mailer,
        },
        &config,
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot listen on {addr}: {e}"));
    tracing::info!(%addr, "ShareEase/Ventopia API listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server terminated with an error");
    }

    pool.close().await;
    tracing::info!("Database pool closed, bye");
}

/// Connect, verify, and migrate. Any failure aborts startup.
async fn prepare_database(config: &ServerConfig) -> DbPool {
    let pool = sv_db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .unwrap_or_else(|e| panic!("Cannot connect to database: {e}"));
    sv_db::health_check(&pool)
        .await
        .unwrap_or_else(|e| panic!("Database health check failed: {e}"));
    sv_db::run_migrations(&pool)
        .await
        .unwrap_or_else(|e| panic!("Migrations failed: {e}"));
    tracing::info!(
        max_connections = config.database_max_connections,
        "Database ready"
    );
    pool
}

/// `LOG_FORMAT=json` switches to JSON lines; the filter comes from `RUST_LOG`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sv_api=debug,sv_mail=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Interrupted, draining connections"),
        () = terminate => tracing::info!("Terminated, draining connections"),
    }
}
