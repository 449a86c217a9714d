use chrono::Utc;
use gym_desk::{
    AppConfig, AppState, RecordStore, lifecycle::seed_demo_members, routines::RoutineAdvisor,
    router,
};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();

    let mut store = RecordStore::open(&config.data_dir).await?;
    if config.seed_demo {
        seed_demo_members(&mut store, Utc::now()).await?;
    }
    if config.generator.api_key.is_none() {
        warn!("no GEMINI_API_KEY set; routine generation will return fallback text");
    }

    let advisor = RoutineAdvisor::new(config.gym_name.clone(), config.generator.clone());
    let app = router(AppState::new(store, advisor));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
