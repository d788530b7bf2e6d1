use statpad::config::Config;
use statpad::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting statpad...");

    if dotenvy::dotenv().is_err() {
        tracing::warn!("No .env file found, using process environment");
    }

    let config = Config::from_env().expect("Invalid configuration");
    let addr = config.socket_addr();
    tracing::info!("Reading CSV inputs from {}", config.data_dir.display());

    let state = AppState::new(config).expect("Failed to build HTTP client");
    let app = statpad::app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server.");
}
