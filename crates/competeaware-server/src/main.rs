mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use competeaware_classifier::ClassifierService;
use competeaware_db::PgUpdateStore;
use competeaware_pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = competeaware_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = competeaware_db::PoolConfig::from_app_config(&config);
    let pool = competeaware_db::connect_pool(&config.database_url, pool_config).await?;
    competeaware_db::run_migrations(&pool).await?;

    let classifier = Arc::new(ClassifierService::new(config.classifier_model_path.clone()));
    match classifier.init().await {
        Ok(source) => tracing::info!(?source, path = %classifier.model_path().display(), "classifier ready"),
        Err(e) => tracing::warn!(error = %e, "classifier unavailable; predictions fall back to 'other'"),
    }

    let pipeline = Arc::new(Pipeline::from_app_config(
        PgUpdateStore::new(pool.clone()),
        classifier,
        &config,
    )?);

    let _scheduler = if config.scrape_schedule_enabled {
        Some(scheduler::build_scheduler(Arc::clone(&pipeline), &config).await?)
    } else {
        tracing::info!("scheduled scraping disabled");
        None
    };

    let app = build_app(AppState { pool, pipeline });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
