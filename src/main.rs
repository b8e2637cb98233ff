use std::net::SocketAddr;

use tokio::net::TcpListener;

use portfolio_backend::api;
use portfolio_backend::config::{Config, MailBackend};
use portfolio_backend::mail::Mailer;
use portfolio_backend::server::{init_tracing, shutdown_signal};
use portfolio_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Starting portfolio backend...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        host = %config.server_host,
        port = %config.server_port,
        environment = ?config.environment,
        static_dir = %config.static_dir.display(),
        "Configuration loaded"
    );

    match &config.mail.backend {
        MailBackend::Real(credentials) => {
            tracing::info!(user = %credentials.user, "Using Outlook for email delivery")
        }
        MailBackend::Sandbox => tracing::warn!(
            "EMAIL_USER and EMAIL_PASS are not set; contact messages go to disposable Ethereal accounts"
        ),
    }

    let mailer = Mailer::new(&config.mail);
    tracing::info!(recipient = %mailer.recipient(), "Mailer initialized");

    let state = AppState::new(config.clone(), mailer);
    let app = api::create_router(state);

    // Start server
    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
