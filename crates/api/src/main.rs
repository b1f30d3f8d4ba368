use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediar_api::config::ServerConfig;
use mediar_api::router::build_app_router;
use mediar_api::state::AppState;
use mediar_assist::{AssistConfig, Assistant, StorageRoots};
use mediar_documents::ActaGenerator;
use mediar_notify::{EmailConfig, Mailer};
use mediar_payments::{StripeClient, StripeConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediar_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = mediar_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    mediar_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    mediar_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Storage ---
    for dir in [&config.upload_dir, &config.actas_dir] {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create {}: {e}", dir.display()));
    }

    // --- Integrations ---
    let mut state = AppState::new(pool, config.clone());

    match EmailConfig::from_env() {
        Some(email) => {
            tracing::info!(host = %email.smtp_host, "SMTP email enabled");
            state.mailer = Some(Arc::new(Mailer::new(email)));
        }
        None => tracing::warn!("SMTP_HOST not set, outgoing email disabled"),
    }

    match StripeConfig::from_env() {
        Some(stripe) => {
            let client = StripeClient::new(stripe).expect("Failed to build Stripe client");
            state.stripe = Some(Arc::new(client));
            tracing::info!("Stripe payments enabled");
        }
        None => tracing::warn!("STRIPE_SECRET_KEY not set, payments disabled"),
    }
    if config.stripe_webhook_secret.is_none() {
        tracing::warn!("STRIPE_WEBHOOK_SECRET not set, webhook signatures will not be verified");
    }

    match AssistConfig::from_env() {
        Some(assist) => {
            let roots = StorageRoots {
                uploads: config.upload_dir.clone(),
                actas: config.actas_dir.clone(),
            };
            let assistant = Assistant::new(assist, roots).expect("Failed to build AI assistant");
            tracing::info!(model = %assistant.model(), "Legal assistant enabled");
            state.assistant = Some(Arc::new(assistant));
        }
        None => tracing::warn!("AI_API_KEY not set, legal assistant disabled"),
    }

    if let Some(path) = &config.acta_template_path {
        let generator = ActaGenerator::from_template_file(path)
            .unwrap_or_else(|e| panic!("Failed to load acta template {}: {e}", path.display()));
        tracing::info!(path = %path.display(), "Loaded acta template");
        state.actas = Arc::new(generator);
    }

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
