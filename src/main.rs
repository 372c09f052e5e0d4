use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use dotenvy::dotenv;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use mail_relay::{app::create_app, config::AppConfig, email::EmailService, state::SharedAppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mail_relay=info,tower_http=info")),
    )
    .init();

  let config = AppConfig::from_env().context("Failed to load configuration")?;

  let email_service = EmailService::new(config.smtp.clone(), config.mail.send_timeout).context("Failed to build SMTP transport")?;
  tracing::info!(
    "SMTP transport configured for {}:{} (secure: {})",
    config.smtp.host,
    config.smtp.port,
    config.smtp.secure
  );

  let app_state = SharedAppState::new(Arc::new(email_service), &config);
  let app = create_app(app_state, &config);

  let addr = config.server.bind_address();
  let listener = tokio::net::TcpListener::bind(&addr)
    .await
    .with_context(|| format!("Failed to bind {}", addr))?;

  tracing::info!("Server running on http://{}", listener.local_addr()?);

  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
  };

  #[cfg(unix)]
  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("Failed to install signal handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
