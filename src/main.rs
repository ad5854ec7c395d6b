use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use flag_toggle::config::{Config, redact_database_url};
use flag_toggle::router::{FlagState, flag_router};
use flag_toggle::{FlagError, FlagService, db};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    if let Err(e) = run(cfg).await {
        error!(error = %e, "fatal startup error");
        return Err(e.into());
    }
    Ok(())
}

async fn run(cfg: Config) -> Result<(), FlagError> {
    if cfg.uses_default_database() {
        info!("no DB_CONN_STR found, using default local connection string");
    }
    info!(
        database_url = %redact_database_url(cfg.database_url()),
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        connect_attempts = cfg.connect_attempts,
        connect_delay_secs = cfg.connect_delay_secs
    );

    let store = db::connect(cfg.database_url(), cfg.retry_policy(), cfg.max_connections).await?;

    // Serving starts only after the table, default row and cache are ready.
    let service = Arc::new(FlagService::new(store));
    service.initialize().await?;

    let app = flag_router(FlagState::new(service));

    let addr = cfg.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
