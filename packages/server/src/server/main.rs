// Main entry point for API server

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use llm_client::{KeyPool, LlmClient};
use server_core::domains::auth::JwtService;
use server_core::kernel::{BaseAI, ServerDeps, Store};
use server_core::server::{build_app, AppSettings, RateLimit};
use server_core::stores::{MemoryStore, PostgresStore};
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use youtube_client::ContentFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Video Quiz API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let store = PostgresStore::new(url).await?;
            tracing::info!("Database connected");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    let ai: Option<Arc<dyn BaseAI>> = match KeyPool::from_list(
        config.gemini_api_keys.as_deref(),
        config.gemini_api_key.as_deref(),
    ) {
        Some(keys) => {
            tracing::info!(keys = keys.len(), "LLM configured");
            let mut client = LlmClient::new(keys);
            if let Some(url) = &config.llm_base_url {
                client = client.with_base_url(url.clone());
            }
            if let Some(model) = &config.llm_model {
                client = client.with_model(model.clone());
            }
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("No Gemini API key configured; AI features are unavailable");
            None
        }
    };

    let content = Arc::new(ContentFetcher::new().context("Failed to create content fetcher")?);
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    let deps = ServerDeps::new(store, ai, content, jwt_service);
    let app = build_app(
        deps,
        AppSettings {
            allowed_origins: config.allowed_origins.clone(),
            rate_limit: Some(RateLimit::default()),
        },
    )?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
