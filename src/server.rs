use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::routes;
use crate::seed;
use crate::state::AppState;

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(config: AppConfig, seed_on_start: bool) -> anyhow::Result<()> {
    let address = config.server_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    serve_on(listener, config, seed_on_start).await
}

/// Serve on an already bound listener. Integration tests use this with a picked port.
pub async fn serve_on(
    listener: TcpListener,
    config: AppConfig,
    seed_on_start: bool,
) -> anyhow::Result<()> {
    let store = DatabaseManager::open_store(&config).await?;
    let state = AppState::new(store, &config);

    if seed_on_start || config.seed.load_on_start {
        let summary = seed::seed_if_empty(&state.guard)
            .await
            .context("failed to seed starter roster")?;
        if !summary.is_empty() {
            info!(
                "Loaded starter roster ({} sports, {} contingents, {} athletes)",
                summary.sports, summary.contingents, summary.athletes
            );
        }
    }

    let app = routes::app(state, &config);
    let local = listener.local_addr().context("listener has no local address")?;
    info!(
        "Summer Games API listening on http://{} ({:?}, {:?} store)",
        local, config.environment, config.storage.backend
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
