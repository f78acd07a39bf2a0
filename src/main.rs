use clap::Parser;
use tracing_subscriber::EnvFilter;

use contact_book_api::{app, config, AppState};

#[derive(Parser)]
#[command(name = "contact-book-api")]
#[command(about = "Contact book REST API: users, contacts and postal addresses")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Keep all data in memory, ignoring any database URL
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                if contact_book_api::is_development!() {
                    EnvFilter::new("info,tower_http=debug")
                } else {
                    EnvFilter::new("info")
                }
            }),
        )
        .init();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.database_url.filter(|url| !url.trim().is_empty()) {
        config.database.url = Some(url);
    }
    tracing::info!("Starting Contact Book API in {:?} mode", config.environment);

    let state = AppState::from_config(&config, args.memory).await?;
    let router = app(state, &config.security);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, router).await?;
    Ok(())
}
