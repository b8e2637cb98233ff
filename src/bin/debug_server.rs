use std::net::SocketAddr;

use tokio::net::TcpListener;

use portfolio_backend::config::Config;
use portfolio_backend::debug::debug_router;
use portfolio_backend::server::{init_tracing, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let app = debug_router(&config.static_dir);

    let addr: SocketAddr = config.debug_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        address = %addr,
        static_dir = %config.static_dir.display(),
        "Debug server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
