use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let mut config = config::Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    init_tracing(config.logging.json);
    tracing::info!("config: {}", args.config);

    ensure_data_dirs(&config);

    let db = quickpoll_db::create_pool(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    quickpoll_db::run_migrations(&db).await?;

    let identifier =
        quickpoll_core::identity::ProxyHeaderIdentifier::new(&config.identity.client_ip_header)
            .with_context(|| {
                format!(
                    "invalid identity.client_ip_header {:?}",
                    config.identity.client_ip_header
                )
            })?;

    if config.admin.secret.is_empty() {
        tracing::warn!("admin secret not configured; admin listing is disabled");
    }

    let state = quickpoll_core::AppState::new(
        db.clone(),
        quickpoll_core::AppConfig {
            admin_secret: config.admin.secret.clone(),
        },
    )
    .with_voter_identifier(Arc::new(identifier));

    let app = quickpoll_api::build_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;
    tracing::info!(
        "listening on http://{} (database: {}, voter header: {})",
        config.server.bind_address,
        config.database.url,
        config.identity.client_ip_header
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quickpoll=info,tower_http=debug"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}

/// Create the SQLite parent directory before the pool opens the file.
fn ensure_data_dirs(config: &config::Config) {
    if let Some(parent) = config.sqlite_path().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Could not create directory '{}': {}", parent.display(), e);
            }
        }
    }
}
