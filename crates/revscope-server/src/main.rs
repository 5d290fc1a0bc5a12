mod api;
mod middleware;

use std::sync::Arc;

use revscope_core::Limits;
use revscope_db::PgReviewStore;
use revscope_text::TeiClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = revscope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(?config, "starting revscope server");

    let pool_config = revscope_db::PoolConfig::from_app_config(&config);
    let pool = revscope_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = revscope_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations complete");

    let embedder = TeiClient::new(&config.tei_url, config.tei_timeout_secs)?;

    let app = build_app(AppState {
        store: Arc::new(PgReviewStore::new(pool)),
        embedder: Arc::new(embedder),
        limits: Limits::default(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
