use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediar_mailbox::{MailboxConfig, Responder};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediar_mailbox=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MailboxConfig::from_env();
    tracing::info!(
        host = %config.imap_host,
        mailbox = %config.mailbox,
        interval_secs = config.poll_interval.as_secs(),
        "Starting mailbox responder"
    );

    let cancel = CancellationToken::new();
    let responder = Responder::new(config);
    let loop_cancel = cancel.clone();
    let handle = tokio::spawn(async move { responder.run(loop_cancel).await });

    shutdown_signal().await;
    cancel.cancel();
    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Responder task ended abnormally");
    }
    tracing::info!("Mailbox responder stopped");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
