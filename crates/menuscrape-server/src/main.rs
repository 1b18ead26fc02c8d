mod api;
mod jobs;
mod middleware;

use std::sync::Arc;
use std::time::Instant;

use menuscrape_scraper::HttpPageLoader;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    jobs::InMemoryJobStore,
};

/// Base delay for the static loader's retry backoff.
const FETCH_BACKOFF_BASE_MS: u64 = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(menuscrape_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let profiles = menuscrape_core::load_profiles(config.profiles_path.as_deref())?;
    tracing::info!(sites = ?profiles.ids(), env = %config.env, "site profiles loaded");

    let loader = HttpPageLoader::new(config.fetch_max_retries, FETCH_BACKOFF_BASE_MS)?;
    let app = build_app(AppState {
        config: Arc::clone(&config),
        profiles: Arc::new(profiles),
        jobs: Arc::new(InMemoryJobStore::new()),
        loader,
        started_at: Instant::now(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, output_dir = %config.output_dir.display(), "menu scrape server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on ctrl-c, or SIGTERM on unix. Running background jobs are
/// dropped with the runtime.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                tracing::warn!(error = %err, "ctrl-c handler failed");
            }
            "ctrl-c"
        }
        () = terminate => "SIGTERM",
    };

    tracing::info!(%signal, "shutting down menu scrape server");
}
