use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sibima_admin::backend::rest::RestBackend;
use sibima_admin::config::AppConfig;
use sibima_admin::routes;
use sibima_admin::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        backend_url = %config.backend_url,
        service_key = %config.redacted_service_key(),
        server_host = %config.server_host,
        server_port = config.server_port,
        activity_feed_limit = config.activity_feed_limit,
        "loaded configuration"
    );

    let backend = Arc::new(RestBackend::from_config(&config)?);
    let state = AppState::new(backend, config);

    let listen_addr: SocketAddr = {
        let config = state.config.clone();
        format!("{}:{}", config.server_host, config.server_port).parse()?
    };
    let router = routes::create_router(state);

    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!("listening on {}", listen_addr);

    axum::serve(listener, router).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
