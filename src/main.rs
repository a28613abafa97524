use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lifedrop_api::auth::JwtVerifier;
use lifedrop_api::cli::Args;
use lifedrop_api::config::AppConfig;
use lifedrop_api::database::{DatabaseManager, DocumentStore, MemoryStore, PgDocumentStore};
use lifedrop_api::services::{DonationLifecycle, Permissive, StatusTransitionPolicy, StripeGateway};
use lifedrop_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DATABASE_URL, IDENTITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let mut config = AppConfig::from_env();

    let default_level = if config.is_development() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!("Starting LifeDrop API in {:?} mode", config.environment);

    let store: Arc<dyn DocumentStore> = match (&config.database.url, args.in_memory) {
        (Some(_), false) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            tracing::info!("Using Postgres document store");
            Arc::new(PgDocumentStore::new(pool))
        }
        _ => {
            tracing::warn!("Using in-memory document store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    if config.identity.jwt_secret.is_empty() {
        tracing::warn!("IDENTITY_JWT_SECRET is not set; every protected route will answer 403");
    }
    if config.payments.secret_key.is_empty() {
        tracing::warn!("PAYMENT_SECRET_KEY is not set; payment intents will fail");
    }

    let transitions: Arc<dyn StatusTransitionPolicy> = if config.policy.strict_donation_lifecycle {
        tracing::info!("Enforcing forward-only donation lifecycle");
        Arc::new(DonationLifecycle)
    } else {
        Arc::new(Permissive)
    };

    let state = AppState {
        store,
        verifier: Arc::new(JwtVerifier::new(&config.identity)),
        payments: Arc::new(StripeGateway::new(&config.payments)?),
        transitions,
        listing: config.listing.clone(),
    };

    let router = app(state, &config.security);

    let bind_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.server.host, config.server.port))?;
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Server is running on port {}", config.server.port);

    axum::serve(listener, router).await?;
    Ok(())
}
