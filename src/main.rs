use std::sync::Arc;

use anyhow::Context;
use faculty_chat_relay::app::{app, AppState};
use faculty_chat_relay::auth::JwtKeys;
use faculty_chat_relay::chat::{ChatPolicy, ChatService};
use faculty_chat_relay::config;
use faculty_chat_relay::database::{DatabaseManager, PgRecordStore};
use faculty_chat_relay::llm::GeminiClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, GEMINI_API_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting chat relay in {:?} mode", config.environment);

    let policy = ChatPolicy::load(config.chat.policy_path.as_deref()).context("loading chat policy")?;
    tracing::info!(
        rules = policy.detector.rules().len(),
        sample_limit = policy.sample_limit,
        "Chat policy loaded from {}",
        config.chat.policy_path.as_deref().unwrap_or("built-in defaults")
    );

    let store = PgRecordStore::new(DatabaseManager::from_config(&config.database)?);
    let model = GeminiClient::new(&config.llm)?;
    let service = ChatService::new(policy, Arc::new(store), Arc::new(model))
        .with_error_detail(config.chat.expose_error_detail);

    let state = AppState::new(service, JwtKeys::new(&config.security.jwt_secret));
    let app = app(state, &config.api, &config.security);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Chat relay listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
