use dotenvy::dotenv;
use gc_tickets::config::{self, AppConfig};
use gc_tickets::errors::Result;
use gc_tickets::tickets::TicketService;
use gc_tickets::{api, bot};
use poise::serenity_prelude as serenity;
use std::{env, net::SocketAddr, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = Arc::new(
        AppConfig::load().inspect_err(|e| error!("Failed to load configuration: {e}"))?,
    );
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db).await?;

    // 5. Secrets are loaded directly before use, never stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))?;
    let shared_secret = env::var("DISCORD_BOT_SECRET")
        .inspect_err(|e| error!("DISCORD_BOT_SECRET not found: {e}"))?;

    // 6. Construct the injected service handles
    let http = Arc::new(serenity::Http::new(&token));
    let service = Arc::new(TicketService::new(http, db, Arc::clone(&app_config)));

    // 7. Serve the HTTP API in the background
    let state = api::AppState::new(Arc::clone(&service), shared_secret, &app_config);
    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.api.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {addr}");
    let router = api::router(state);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("API server error: {e}");
        }
    });

    // 8. Run the bot until shutdown
    bot::run_bot(token, service).await
}
