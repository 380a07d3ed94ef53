mod config;
mod error;
mod handlers;
mod models;
mod output;
mod scraping;

use config::Config;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional, real env vars win
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Start scraping");
    handlers::run::run(&config).await?;

    Ok(())
}
