use tracing_subscriber::EnvFilter;

use campus_api::config;
use campus_api::is_production;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("campus_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Campus API in {:?} mode", config.environment);

    if is_production!() && config.uses_insecure_secret() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    campus_api::server::serve(config).await
}
