//! HTTP Cat Cache - A caching proxy for HTTP status code images
//!
//! Serves images from a local cache directory and fills misses from http.cat.

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use http_cat_cache::{cache::ImageCache, create_router, AppState, Config};

/// Main entry point for the image cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Parse configuration from command-line arguments
/// 3. Open the cache directory, creating it if absent (fatal on failure)
/// 4. Bind the listener and serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "http_cat_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_args();
    info!(
        "Configuration loaded: host={}, port={}, cache={}",
        config.host,
        config.port,
        config.cache_dir.display()
    );

    // Phase 1: storage must be ready before any connection is accepted
    let state = match AppState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Error creating cache directory");
            return Err(e).context("failed to initialize cache storage");
        }
    };
    let cache = state.cache.clone();

    // Phase 2: serve
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_target())
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr().context("failed to read local address")?;

    info!("Server started on http://{}", addr);
    info!("Cache saved in: {}", config.cache_dir.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cache))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM) and logs cache statistics.
async fn shutdown_signal(cache: ImageCache) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    let stats = cache.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        fills = stats.fills,
        upstream_not_found = stats.upstream_not_found,
        upstream_faults = stats.upstream_faults,
        hit_rate = stats.hit_rate(),
        "Cache statistics"
    );
}
